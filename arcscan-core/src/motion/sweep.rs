//! Servo sweep ranges
//!
//! A sweep walks the servo one degree at a time from a start angle to an end
//! angle, inclusive of both ends.

use core::iter::FusedIterator;

/// Direction of a sweep
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SweepDirection {
    /// Increasing angle
    Ascending,
    /// Decreasing angle
    Descending,
}

impl SweepDirection {
    /// Direction of travel from `from` to `to`
    ///
    /// A zero-length sweep counts as ascending.
    pub fn of(from: u8, to: u8) -> Self {
        if from <= to {
            SweepDirection::Ascending
        } else {
            SweepDirection::Descending
        }
    }
}

/// Iterator over every integer angle between two endpoints
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sweep {
    next: u8,
    end: u8,
    direction: SweepDirection,
    done: bool,
}

impl Sweep {
    /// Create a sweep from `from` to `to`, both inclusive
    pub fn new(from: u8, to: u8) -> Self {
        Self {
            next: from,
            end: to,
            direction: SweepDirection::of(from, to),
            done: false,
        }
    }

    /// Direction of travel
    pub fn direction(&self) -> SweepDirection {
        self.direction
    }

    fn remaining(&self) -> usize {
        if self.done {
            0
        } else {
            self.next.abs_diff(self.end) as usize + 1
        }
    }
}

impl Iterator for Sweep {
    type Item = u8;

    fn next(&mut self) -> Option<u8> {
        if self.done {
            return None;
        }
        let angle = self.next;
        if angle == self.end {
            self.done = true;
        } else {
            self.next = match self.direction {
                SweepDirection::Ascending => angle + 1,
                SweepDirection::Descending => angle - 1,
            };
        }
        Some(angle)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.remaining();
        (n, Some(n))
    }
}

impl ExactSizeIterator for Sweep {}

impl FusedIterator for Sweep {}
