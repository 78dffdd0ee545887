//! Hardware driver implementations
//!
//! This crate provides concrete implementations of the traits defined
//! in arcscan-core on top of `embedded-hal`:
//!
//! - Hobby servo on a PWM channel
//! - 28BYJ-48 stepper through a ULN2003 darlington array
//! - VL53L1X time-of-flight distance sensor over async I2C

#![no_std]
#![deny(unsafe_code)]

pub mod sensor;
pub mod servo;
pub mod stepper;
