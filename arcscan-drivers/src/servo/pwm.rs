//! Hobby servo on a 50 Hz PWM channel
//!
//! Position is encoded as the high time of each frame: `min_pulse_us` at 0°
//! up to `max_pulse_us` at full travel.

use arcscan_core::config::{ServoConfig, MAX_SERVO_ANGLE};
use arcscan_core::traits::{ServoDriver, ServoError};
use embedded_hal::pwm::SetDutyCycle;

/// Mechanical travel the pulse range maps onto
pub const SERVO_TRAVEL_DEG: u8 = MAX_SERVO_ANGLE;

/// Servo driven by a single PWM channel
pub struct PwmServo<P> {
    pwm: P,
    min_angle: u8,
    max_angle: u8,
    min_pulse_us: u16,
    max_pulse_us: u16,
    period_us: u16,
    angle: u8,
}

impl<P: SetDutyCycle> PwmServo<P> {
    /// Create a servo driver; the output stays off until the first command
    pub fn new(pwm: P, config: &ServoConfig) -> Self {
        Self {
            pwm,
            min_angle: config.min_angle,
            max_angle: config.max_angle.min(SERVO_TRAVEL_DEG),
            min_pulse_us: config.min_pulse_us,
            max_pulse_us: config.max_pulse_us,
            period_us: config.period_us,
            angle: config.min_angle,
        }
    }

    /// Pulse width for an angle, after clamping to the allowed range
    pub fn pulse_us(&self, angle: u8) -> u16 {
        let angle = angle.clamp(self.min_angle, self.max_angle) as u32;
        let span = self.max_pulse_us.saturating_sub(self.min_pulse_us) as u32;
        self.min_pulse_us + (angle * span / SERVO_TRAVEL_DEG as u32) as u16
    }
}

impl<P: SetDutyCycle> ServoDriver for PwmServo<P> {
    fn write_angle(&mut self, angle: u8) -> Result<(), ServoError> {
        let angle = angle.clamp(self.min_angle, self.max_angle);
        let pulse = self.pulse_us(angle);
        self.pwm
            .set_duty_cycle_fraction(pulse, self.period_us)
            .map_err(|_| ServoError::PwmFault)?;
        self.angle = angle;
        Ok(())
    }

    fn angle(&self) -> u8 {
        self.angle
    }

    fn detach(&mut self) -> Result<(), ServoError> {
        self.pwm
            .set_duty_cycle_fully_off()
            .map_err(|_| ServoError::PwmFault)
    }
}
