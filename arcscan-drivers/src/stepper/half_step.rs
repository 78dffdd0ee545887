//! Half-step sequencing for the 28BYJ-48
//!
//! Walks the 8-slot half-step table one entry per step with a fixed delay
//! between entries, then de-energizes the coils so the motor does not heat
//! up while parked.
//!
//! The motor remembers the last slot it energized. Every step moves one slot
//! from there in the requested direction before writing, so a reversal backs
//! off by exactly one slot. A fresh motor starts by writing slot 0.

use arcscan_core::motion::{degrees_to_steps, HalfStepPhase};
use arcscan_core::traits::{CoilDriver, Direction, StepperError};
use embedded_hal_async::delay::DelayNs;

/// Stepper motor driven through a coil driver in half-step mode
pub struct HalfStepMotor<C> {
    coils: C,
    last: Option<HalfStepPhase>,
    steps_per_degree: u32,
    step_delay_ms: u32,
}

impl<C: CoilDriver> HalfStepMotor<C> {
    /// Create a motor that has not energized any slot yet
    pub fn new(coils: C, steps_per_degree: u32, step_delay_ms: u32) -> Self {
        Self {
            coils,
            last: None,
            steps_per_degree,
            step_delay_ms,
        }
    }

    /// Last table slot written to the coils, `None` before the first step
    pub fn phase(&self) -> Option<HalfStepPhase> {
        self.last
    }

    /// Whole steps per output degree
    pub fn steps_per_degree(&self) -> u32 {
        self.steps_per_degree
    }

    /// Drive `steps` half-steps in `direction`, then release the coils
    ///
    /// If a coil write fails the coils are released on a best-effort basis
    /// and the first error is returned.
    pub async fn step<D: DelayNs>(
        &mut self,
        delay: &mut D,
        steps: u32,
        direction: Direction,
    ) -> Result<(), StepperError> {
        // Slot for step i: i from slot 0 on a fresh motor, i + 1 from the last write
        let (origin, lead) = match self.last {
            Some(phase) => (phase, 1),
            None => (HalfStepPhase::default(), 0),
        };

        for i in 0..steps {
            let phase = origin.offset(i.wrapping_add(lead), direction);
            if let Err(e) = self.coils.apply(phase.pattern()) {
                let _ = self.coils.release();
                return Err(e);
            }
            self.last = Some(phase);
            delay.delay_ms(self.step_delay_ms).await;
        }
        self.coils.release()
    }

    /// Rotate by whole degrees using integer steps-per-degree scaling
    pub async fn move_degrees<D: DelayNs>(
        &mut self,
        delay: &mut D,
        degrees: u32,
        direction: Direction,
    ) -> Result<u32, StepperError> {
        let steps = degrees_to_steps(degrees, self.steps_per_degree);
        self.step(delay, steps, direction).await?;
        Ok(steps)
    }

    /// De-energize all coils
    pub fn release(&mut self) -> Result<(), StepperError> {
        self.coils.release()
    }
}
