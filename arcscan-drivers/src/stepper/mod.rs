//! Stepper driver implementations

pub mod half_step;
pub mod uln2003;

pub use half_step::HalfStepMotor;
pub use uln2003::Uln2003;
