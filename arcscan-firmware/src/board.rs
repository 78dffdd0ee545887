//! Board pin map
//!
//! RP2040 peripherals are tied to specific pads, so the GPIOs used here are
//! fixed at compile time. `rig.toml` documents the wiring; [`check_wiring`]
//! reports any disagreement at boot.

use arcscan_core::config::RigConfig;
use arcscan_drivers::sensor::Vl53l1x;
use arcscan_drivers::servo::PwmServo;
use arcscan_drivers::stepper::HalfStepMotor;
use arcscan_hal_rp2040::{CoilBank, ServoPwm};
use defmt::*;
use embassy_rp::i2c::{Async, I2c};
use embassy_rp::peripherals::I2C1;

/// UART0 TX
pub const CONSOLE_TX_PIN: u8 = 0;
/// UART0 RX
pub const CONSOLE_RX_PIN: u8 = 1;
/// ULN2003 IN1..IN4
pub const STEPPER_PINS: [u8; 4] = [10, 11, 12, 13];
/// I2C1 SDA
pub const TOF_SDA_PIN: u8 = 14;
/// I2C1 SCL
pub const TOF_SCL_PIN: u8 = 15;
/// PWM slice 0, channel B
pub const SERVO_PIN: u8 = 17;

/// Time-of-flight sensor on I2C1
pub type RigSensor = Vl53l1x<I2c<'static, I2C1, Async>>;

/// Sweep servo on PWM slice 0
pub type RigServo = PwmServo<ServoPwm>;

/// Turntable stepper on GPIO 10-13
pub type RigStepper = HalfStepMotor<CoilBank>;

/// Compare the configured wiring with the pins this board drives
///
/// Returns the number of mismatched pins.
pub fn check_wiring(config: &RigConfig) -> usize {
    let expected = [
        ("servo", config.servo.pin, SERVO_PIN),
        ("tof sda", config.tof.sda_pin, TOF_SDA_PIN),
        ("tof scl", config.tof.scl_pin, TOF_SCL_PIN),
        ("console tx", config.console.tx_pin, CONSOLE_TX_PIN),
        ("console rx", config.console.rx_pin, CONSOLE_RX_PIN),
        ("stepper in1", config.stepper.pins[0], STEPPER_PINS[0]),
        ("stepper in2", config.stepper.pins[1], STEPPER_PINS[1]),
        ("stepper in3", config.stepper.pins[2], STEPPER_PINS[2]),
        ("stepper in4", config.stepper.pins[3], STEPPER_PINS[3]),
    ];

    let mut mismatches = 0;
    for (name, configured, board) in expected {
        if configured != board {
            warn!(
                "{} configured on gpio{} but board uses gpio{}",
                name, configured, board
            );
            mismatches += 1;
        }
    }
    mismatches
}
