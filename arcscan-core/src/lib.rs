//! Board-agnostic core logic for the ArcScan scanner firmware
//!
//! This crate contains all application logic that does not depend on
//! specific hardware implementations:
//!
//! - Hardware abstraction traits (servo, stepper coils, range sensor)
//! - Sweep, half-step and turntable arithmetic
//! - Servo controller cycle plans (phase ordering and timing)
//! - Coordinated scan state machine and point cloud
//! - Serial console line formatting
//! - Configuration type definitions

#![no_std]
#![deny(unsafe_code)]

pub mod config;
pub mod console;
pub mod controller;
pub mod motion;
pub mod scanner;
pub mod traits;
