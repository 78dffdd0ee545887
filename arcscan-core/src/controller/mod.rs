//! Servo controller cycle plans
//!
//! A servo controller loop repeats a fixed sequence of phases: sweep out,
//! hold, sweep back, wait for the turntable. The two controller variants
//! differ only in timing constants and phase ordering, captured here as a
//! [`ControllerProfile`] that expands into a [`CyclePlan`].

pub mod phase;

pub use phase::{Countdown, CyclePlan, Phase, PlannedPhase, MAX_PHASES};

/// Named controller variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ProfileKind {
    /// Slow bench sweep: hold at the far end, stepper window at the near end
    #[default]
    Bench,
    /// Fast sweep: stepper window first, short holds at both ends
    Fast,
}

/// Timing constants for one servo controller variant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ControllerProfile {
    /// Pause at the top of every loop iteration (ms)
    pub lead_in_ms: u32,
    /// Wait after commanding an angle before polling the sensor (ms)
    pub settle_ms: u32,
    /// Total time spent at each angle, settle included (ms)
    pub step_ms: u32,
    /// Hold at the far end of the arc (ms)
    pub far_hold_ms: u32,
    /// Hold at the near end of the arc after the return sweep (ms)
    pub near_hold_ms: u32,
    /// Seconds of stepper window counted down at the near end
    pub countdown_secs: u8,
    /// Run the stepper window before the sweeps instead of after
    pub countdown_first: bool,
}

impl ControllerProfile {
    /// Bench controller timings
    pub const fn bench() -> Self {
        Self {
            lead_in_ms: 1000,
            settle_ms: 50,
            step_ms: 100,
            far_hold_ms: 1000,
            near_hold_ms: 0,
            countdown_secs: 5,
            countdown_first: false,
        }
    }

    /// Fast controller timings
    pub const fn fast() -> Self {
        Self {
            lead_in_ms: 0,
            settle_ms: 30,
            step_ms: 50,
            far_hold_ms: 500,
            near_hold_ms: 500,
            countdown_secs: 5,
            countdown_first: true,
        }
    }

    /// Preset for a named variant
    pub const fn for_kind(kind: ProfileKind) -> Self {
        match kind {
            ProfileKind::Bench => Self::bench(),
            ProfileKind::Fast => Self::fast(),
        }
    }

    /// Wait after the sensor poll before moving to the next angle (ms)
    pub fn remainder_ms(&self) -> u32 {
        self.step_ms.saturating_sub(self.settle_ms)
    }

    /// Time spent at each angle of a sweep (ms)
    pub fn dwell_ms(&self) -> u32 {
        self.settle_ms + self.remainder_ms()
    }

    /// Nominal duration of one loop iteration over `[min, max]` (ms)
    ///
    /// Console output and sensor transactions are not included.
    pub fn cycle_time_ms(&self, min: u8, max: u8) -> u32 {
        CyclePlan::for_profile(self, min, max)
            .iter()
            .map(|planned| planned.phase.duration_ms(self))
            .sum()
    }
}

impl Default for ControllerProfile {
    fn default() -> Self {
        Self::bench()
    }
}
