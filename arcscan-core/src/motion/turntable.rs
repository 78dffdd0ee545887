//! Turntable position bookkeeping
//!
//! The stepper rotates the scan head in fixed increments. Position is
//! tracked in whole degrees and resets to zero once a full turn is reached;
//! the motor is not driven back, the next turn simply continues clockwise.

use super::half_step::degrees_to_steps;

/// Outcome of one turntable increment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TurntableMove {
    /// Degree before the move
    pub from: u16,
    /// Degree after the move, before any wrap reset
    pub to: u16,
    /// Motor steps to drive
    pub steps: u32,
    /// The move completed a full turn and position was reset to zero
    pub wrapped: bool,
}

/// Cumulative turntable position
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Turntable {
    current_degree: u16,
    target_degree: u16,
    increment: u16,
    total_degrees: u16,
    steps_per_degree: u32,
}

impl Turntable {
    /// Create a turntable at 0°
    ///
    /// `increment` is clamped to at least one degree.
    pub fn new(increment: u16, total_degrees: u16, steps_per_degree: u32) -> Self {
        Self {
            current_degree: 0,
            target_degree: 0,
            increment: increment.max(1),
            total_degrees,
            steps_per_degree,
        }
    }

    /// Current position in degrees
    pub fn current_degree(&self) -> u16 {
        self.current_degree
    }

    /// Last commanded target in degrees
    pub fn target_degree(&self) -> u16 {
        self.target_degree
    }

    /// Degrees per increment
    pub fn increment(&self) -> u16 {
        self.increment
    }

    /// Increments in one full turn, rounded up
    pub fn increments_per_turn(&self) -> u16 {
        self.total_degrees.div_ceil(self.increment)
    }

    /// Advance the target by one increment
    ///
    /// Returns the move to perform. Once the new position reaches the full
    /// turn, both current and target are reset to zero.
    pub fn advance(&mut self) -> TurntableMove {
        let from = self.current_degree;
        self.target_degree = self.target_degree.saturating_add(self.increment);
        let to = self.target_degree;
        let steps = degrees_to_steps(self.increment as u32, self.steps_per_degree);
        self.current_degree = to;

        let wrapped = self.current_degree >= self.total_degrees;
        if wrapped {
            self.reset();
        }

        TurntableMove {
            from,
            to,
            steps,
            wrapped,
        }
    }

    /// Return position bookkeeping to 0°
    pub fn reset(&mut self) {
        self.current_degree = 0;
        self.target_degree = 0;
    }
}
