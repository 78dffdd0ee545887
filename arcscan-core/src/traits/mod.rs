//! Hardware abstraction traits
//!
//! These traits define the interface between the application logic
//! and hardware-specific implementations.

pub mod sensor;
pub mod servo;
pub mod stepper;

pub use sensor::{DistanceMode, RangeReading, SensorError, FAILED_READING};
pub use servo::{ServoDriver, ServoError};
pub use stepper::{CoilDriver, CoilPattern, Direction, StepperError};
