//! Motion arithmetic
//!
//! Servo sweep ranges, the 28BYJ-48 half-step table and the turntable
//! position bookkeeping. Everything here is pure and host-testable.

pub mod half_step;
pub mod sweep;
pub mod turntable;

pub use half_step::{
    degrees_to_steps, sequence_index, steps_per_degree, HalfStepPhase, HALF_STEP_SEQUENCE,
    HALF_STEP_LEN,
};
pub use sweep::{Sweep, SweepDirection};
pub use turntable::{Turntable, TurntableMove};
