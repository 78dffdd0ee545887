//! RP2040-specific HAL for the ArcScan scanner firmware
//!
//! This crate provides the RP2040 glue between embassy-rp peripherals and
//! the board-agnostic drivers:
//!
//! - 50 Hz servo PWM slice setup with 1 µs resolution
//! - Stepper coil bank construction from four GPIO outputs

#![no_std]

pub mod coils;
pub mod pwm;

pub use coils::{coil_bank, CoilBank};
pub use pwm::{channel_b, servo_divider, servo_pwm_config, ServoPwm};
