//! Cycle phases and the countdown helper

use super::ControllerProfile;
use crate::motion::Sweep;

/// Maximum phases in one cycle plan
pub const MAX_PHASES: usize = 6;

/// One step of a servo controller loop iteration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Phase {
    /// Unannounced pause at the top of the loop
    LeadIn { ms: u32 },
    /// Sweep with sensor reads at every angle
    Sweep { from: u8, to: u8 },
    /// Hold the servo still
    Hold { at: u8, ms: u32 },
    /// Hold while the turntable moves, logging each remaining second
    Countdown { at: u8, seconds: u8 },
}

impl Phase {
    /// Nominal duration under `profile` (ms)
    pub fn duration_ms(&self, profile: &ControllerProfile) -> u32 {
        match *self {
            Phase::LeadIn { ms } | Phase::Hold { ms, .. } => ms,
            Phase::Sweep { from, to } => Sweep::new(from, to).len() as u32 * profile.dwell_ms(),
            Phase::Countdown { seconds, .. } => seconds as u32 * 1000,
        }
    }

    /// Lead-in phases are not announced on the console
    pub fn is_announced(&self) -> bool {
        !matches!(self, Phase::LeadIn { .. })
    }
}

/// A phase together with its console number
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PlannedPhase {
    /// 1-based number among announced phases, `None` for the lead-in
    pub number: Option<u8>,
    pub phase: Phase,
}

/// Ordered phases of one controller loop iteration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CyclePlan {
    phases: heapless::Vec<PlannedPhase, MAX_PHASES>,
}

impl CyclePlan {
    /// Expand a profile over the arc `[min, max]`
    pub fn for_profile(profile: &ControllerProfile, min: u8, max: u8) -> Self {
        let mut plan = Self {
            phases: heapless::Vec::new(),
        };

        if profile.lead_in_ms > 0 {
            plan.push(Phase::LeadIn {
                ms: profile.lead_in_ms,
            });
        }
        if profile.countdown_first && profile.countdown_secs > 0 {
            plan.push(Phase::Countdown {
                at: min,
                seconds: profile.countdown_secs,
            });
        }
        plan.push(Phase::Sweep { from: min, to: max });
        if profile.far_hold_ms > 0 {
            plan.push(Phase::Hold {
                at: max,
                ms: profile.far_hold_ms,
            });
        }
        plan.push(Phase::Sweep { from: max, to: min });
        if profile.near_hold_ms > 0 {
            plan.push(Phase::Hold {
                at: min,
                ms: profile.near_hold_ms,
            });
        }
        if !profile.countdown_first && profile.countdown_secs > 0 {
            plan.push(Phase::Countdown {
                at: min,
                seconds: profile.countdown_secs,
            });
        }

        plan
    }

    // At most six phases can be generated above, so the push cannot fail.
    fn push(&mut self, phase: Phase) {
        let announced = self
            .phases
            .iter()
            .filter(|p| p.phase.is_announced())
            .count() as u8;
        let number = phase.is_announced().then_some(announced + 1);
        let _ = self.phases.push(PlannedPhase { number, phase });
    }

    /// Phases in execution order
    pub fn iter(&self) -> impl Iterator<Item = &PlannedPhase> {
        self.phases.iter()
    }

    /// Number of phases
    pub fn len(&self) -> usize {
        self.phases.len()
    }

    /// True if the plan has no phases
    pub fn is_empty(&self) -> bool {
        self.phases.is_empty()
    }
}

/// Remaining-seconds iterator: `n, n-1, .., 1`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Countdown {
    remaining: u8,
}

impl Countdown {
    pub fn new(seconds: u8) -> Self {
        Self { remaining: seconds }
    }
}

impl Iterator for Countdown {
    type Item = u8;

    fn next(&mut self) -> Option<u8> {
        if self.remaining == 0 {
            return None;
        }
        let current = self.remaining;
        self.remaining -= 1;
        Some(current)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.remaining as usize;
        (n, Some(n))
    }
}

impl ExactSizeIterator for Countdown {}
