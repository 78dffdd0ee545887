//! Stepper coil driver trait
//!
//! The 28BYJ-48 is driven directly through a ULN2003 darlington array: four
//! GPIO outputs, one per coil, energized in a half-step sequence.

/// Motor rotation direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    /// Clockwise rotation (forward through the half-step table)
    #[default]
    Clockwise,
    /// Counter-clockwise rotation (backward through the half-step table)
    CounterClockwise,
}

impl Direction {
    /// Get the opposite direction
    pub fn opposite(self) -> Self {
        match self {
            Direction::Clockwise => Direction::CounterClockwise,
            Direction::CounterClockwise => Direction::Clockwise,
        }
    }
}

/// Energization state of the four coils (IN1..IN4)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CoilPattern(pub [bool; 4]);

impl CoilPattern {
    /// All coils off
    pub const RELEASED: Self = Self([false; 4]);

    /// Build a pattern from the IN1..IN4 levels as 0/1 digits
    pub const fn from_bits(in1: u8, in2: u8, in3: u8, in4: u8) -> Self {
        Self([in1 != 0, in2 != 0, in3 != 0, in4 != 0])
    }

    /// Level of coil `index` (0 = IN1)
    pub fn coil(&self, index: usize) -> bool {
        self.0[index]
    }

    /// Number of energized coils
    pub fn energized(&self) -> usize {
        self.0.iter().filter(|c| **c).count()
    }
}

/// Errors that can occur with stepper operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StepperError {
    /// A coil output could not be driven
    PinFault,
}

/// Trait for coil-level stepper outputs
///
/// Implementations map a [`CoilPattern`] onto physical pins. Timing and
/// sequencing live above this trait.
pub trait CoilDriver {
    /// Drive all four coils to the given pattern
    fn apply(&mut self, pattern: CoilPattern) -> Result<(), StepperError>;

    /// De-energize every coil
    fn release(&mut self) -> Result<(), StepperError> {
        self.apply(CoilPattern::RELEASED)
    }
}
