//! Scan progress snapshot

use super::state::ScanState;

/// Current position of a coordinated scan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ScanProgress {
    pub state: ScanState,
    /// Last commanded servo angle
    pub servo_angle: u8,
    /// Turntable position in degrees
    pub stepper_angle: u16,
    /// Points accepted into the cloud this turn
    pub points_collected: u32,
    /// Turntable increments completed this turn
    pub current_cycle: u16,
    /// Turntable increments in a full turn
    pub total_cycles: u16,
}

impl ScanProgress {
    /// Fresh progress for a turn of `total_cycles` increments
    pub fn new(total_cycles: u16) -> Self {
        Self {
            total_cycles,
            ..Self::default()
        }
    }

    /// Completion in whole percent, 0 when the turn length is unknown
    pub fn percent(&self) -> u8 {
        if self.total_cycles == 0 {
            return 0;
        }
        let pct = self.current_cycle as u32 * 100 / self.total_cycles as u32;
        pct.min(100) as u8
    }

    /// True once every increment of the turn has been made
    pub fn is_complete(&self) -> bool {
        self.total_cycles > 0 && self.current_cycle >= self.total_cycles
    }
}
