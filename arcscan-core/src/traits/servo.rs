//! Hobby servo driver trait

/// Errors that can occur with servo operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ServoError {
    /// PWM output rejected the duty cycle
    PwmFault,
}

/// Trait for position-commanded servos
///
/// The servo has no feedback: [`ServoDriver::angle`] reports the last
/// commanded position, not a measured one.
pub trait ServoDriver {
    /// Command an absolute angle in degrees
    ///
    /// Angles outside the servo's range are clamped.
    fn write_angle(&mut self, angle: u8) -> Result<(), ServoError>;

    /// Last commanded angle
    fn angle(&self) -> u8;

    /// Stop the pulse train so the servo no longer holds position
    fn detach(&mut self) -> Result<(), ServoError>;
}
