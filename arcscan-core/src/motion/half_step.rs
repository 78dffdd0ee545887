//! 28BYJ-48 half-step sequencing
//!
//! The motor is driven with an 8-state table that alternates between one and
//! two energized coils. Each table slot is one motor step; with the internal
//! 1:64 gearbox that gives 4096 steps per output revolution.

use crate::traits::{CoilPattern, Direction};

/// Number of entries in the half-step table
pub const HALF_STEP_LEN: usize = 8;

/// Half-step coil table, IN1..IN4
pub const HALF_STEP_SEQUENCE: [CoilPattern; HALF_STEP_LEN] = [
    CoilPattern::from_bits(1, 0, 0, 0),
    CoilPattern::from_bits(1, 1, 0, 0),
    CoilPattern::from_bits(0, 1, 0, 0),
    CoilPattern::from_bits(0, 1, 1, 0),
    CoilPattern::from_bits(0, 0, 1, 0),
    CoilPattern::from_bits(0, 0, 1, 1),
    CoilPattern::from_bits(0, 0, 0, 1),
    CoilPattern::from_bits(1, 0, 0, 1),
];

/// Table index for the `step`-th step of a move
///
/// Clockwise walks the table forward, counter-clockwise walks it backward
/// starting from slot 0.
pub fn sequence_index(step: u32, direction: Direction) -> usize {
    let slot = (step & 7) as usize;
    match direction {
        Direction::Clockwise => slot,
        Direction::CounterClockwise => (HALF_STEP_LEN - slot) & 7,
    }
}

/// Whole steps per output degree (integer division, remainder dropped)
pub fn steps_per_degree(steps_per_revolution: u32) -> u32 {
    steps_per_revolution / 360
}

/// Steps for a move of `degrees` at a given steps-per-degree scale
///
/// Saturates at `u32::MAX` rather than wrapping.
pub fn degrees_to_steps(degrees: u32, steps_per_degree: u32) -> u32 {
    degrees.saturating_mul(steps_per_degree)
}

/// Position within the half-step table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct HalfStepPhase(u8);

impl HalfStepPhase {
    /// Phase at a table index (taken modulo 8)
    pub fn new(index: usize) -> Self {
        Self((index & 7) as u8)
    }

    /// Current table index
    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// Coil pattern for the current phase
    pub fn pattern(self) -> CoilPattern {
        HALF_STEP_SEQUENCE[self.index()]
    }

    /// Phase `steps` slots away in `direction`
    pub fn offset(self, steps: u32, direction: Direction) -> Self {
        Self::new(self.index() + sequence_index(steps, direction))
    }

    /// Move one slot in `direction`, wrapping modulo 8
    pub fn advance(&mut self, direction: Direction) {
        *self = self.offset(1, direction);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_alternates_one_and_two_coils() {
        for (i, pattern) in HALF_STEP_SEQUENCE.iter().enumerate() {
            let expected = if i % 2 == 0 { 1 } else { 2 };
            assert_eq!(pattern.energized(), expected, "slot {}", i);
        }
    }

    #[test]
    fn test_adjacent_slots_share_a_coil() {
        for i in 0..HALF_STEP_LEN {
            let a = HALF_STEP_SEQUENCE[i];
            let b = HALF_STEP_SEQUENCE[(i + 1) % HALF_STEP_LEN];
            assert!((0..4).any(|c| a.coil(c) && b.coil(c)), "slot {}", i);
        }
    }

    #[test]
    fn test_sequence_index_clockwise() {
        let got: [usize; 10] =
            core::array::from_fn(|s| sequence_index(s as u32, Direction::Clockwise));
        assert_eq!(got, [0, 1, 2, 3, 4, 5, 6, 7, 0, 1]);
    }

    #[test]
    fn test_sequence_index_counter_clockwise() {
        let got: [usize; 10] =
            core::array::from_fn(|s| sequence_index(s as u32, Direction::CounterClockwise));
        assert_eq!(got, [0, 7, 6, 5, 4, 3, 2, 1, 0, 7]);
    }

    #[test]
    fn test_phase_matches_sequence_index() {
        for direction in [Direction::Clockwise, Direction::CounterClockwise] {
            let mut phase = HalfStepPhase::default();
            for step in 0..40 {
                assert_eq!(phase.index(), sequence_index(step, direction));
                phase.advance(direction);
            }
        }
    }

    #[test]
    fn test_phase_round_trip() {
        let mut phase = HalfStepPhase::new(5);
        phase.advance(Direction::Clockwise);
        phase.advance(Direction::Clockwise);
        phase.advance(Direction::Clockwise);
        assert_eq!(phase.index(), 0);
        phase.advance(Direction::CounterClockwise);
        assert_eq!(phase.index(), 7);
        assert_eq!(phase.pattern(), CoilPattern::from_bits(1, 0, 0, 1));
    }

    #[test]
    fn test_steps_per_degree_truncates() {
        assert_eq!(steps_per_degree(4096), 11);
        assert_eq!(steps_per_degree(2048), 5);
        assert_eq!(steps_per_degree(200), 0);
    }

    #[test]
    fn test_degrees_to_steps() {
        assert_eq!(degrees_to_steps(1, 11), 11);
        assert_eq!(degrees_to_steps(5, 11), 55);
        assert_eq!(degrees_to_steps(360, 11), 3960);
        assert_eq!(degrees_to_steps(0, 11), 0);
    }

    #[test]
    fn test_degrees_to_steps_saturates() {
        assert_eq!(degrees_to_steps(u32::MAX, 11), u32::MAX);
        assert_eq!(degrees_to_steps(65_535, 1 << 20), u32::MAX);
    }

    #[test]
    fn test_offset_from_any_slot() {
        let phase = HalfStepPhase::new(6);
        assert_eq!(phase.offset(3, Direction::Clockwise).index(), 1);
        assert_eq!(phase.offset(3, Direction::CounterClockwise).index(), 3);
        assert_eq!(phase.offset(16, Direction::Clockwise), phase);
    }
}
