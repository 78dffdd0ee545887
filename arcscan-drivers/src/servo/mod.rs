//! Servo driver implementations

pub mod pwm;

pub use pwm::{PwmServo, SERVO_TRAVEL_DEG};
