//! ULN2003 darlington array coil driver
//!
//! Each of IN1..IN4 switches one coil of a unipolar stepper. A high input
//! energizes the coil.

use arcscan_core::traits::{CoilDriver, CoilPattern, StepperError};
use embedded_hal::digital::{OutputPin, PinState};

/// Four GPIO outputs wired to a ULN2003 board
pub struct Uln2003<P> {
    pins: [P; 4],
    pattern: CoilPattern,
}

impl<P: OutputPin> Uln2003<P> {
    /// Take ownership of IN1..IN4 and de-energize all coils
    pub fn new(pins: [P; 4]) -> Result<Self, StepperError> {
        let mut driver = Self {
            pins,
            pattern: CoilPattern::RELEASED,
        };
        driver.release()?;
        Ok(driver)
    }

    /// Last pattern written to the coils
    pub fn pattern(&self) -> CoilPattern {
        self.pattern
    }
}

impl<P: OutputPin> CoilDriver for Uln2003<P> {
    fn apply(&mut self, pattern: CoilPattern) -> Result<(), StepperError> {
        for (pin, &level) in self.pins.iter_mut().zip(pattern.0.iter()) {
            pin.set_state(PinState::from(level))
                .map_err(|_| StepperError::PinFault)?;
        }
        self.pattern = pattern;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal::digital::{ErrorKind, ErrorType};

    /// Mock GPIO pin for testing
    struct MockPin {
        high: bool,
        fail: bool,
    }

    impl MockPin {
        fn new(high: bool) -> Self {
            Self { high, fail: false }
        }
    }

    impl ErrorType for MockPin {
        type Error = ErrorKind;
    }

    impl OutputPin for MockPin {
        fn set_low(&mut self) -> Result<(), Self::Error> {
            if self.fail {
                return Err(ErrorKind::Other);
            }
            self.high = false;
            Ok(())
        }

        fn set_high(&mut self) -> Result<(), Self::Error> {
            if self.fail {
                return Err(ErrorKind::Other);
            }
            self.high = true;
            Ok(())
        }
    }

    fn levels(driver: &Uln2003<MockPin>) -> [bool; 4] {
        [
            driver.pins[0].high,
            driver.pins[1].high,
            driver.pins[2].high,
            driver.pins[3].high,
        ]
    }

    #[test]
    fn test_new_releases_coils() {
        let pins = [
            MockPin::new(true),
            MockPin::new(true),
            MockPin::new(false),
            MockPin::new(true),
        ];
        let driver = Uln2003::new(pins).unwrap();
        assert_eq!(levels(&driver), [false; 4]);
        assert_eq!(driver.pattern(), CoilPattern::RELEASED);
    }

    #[test]
    fn test_apply_pattern() {
        let pins = [
            MockPin::new(false),
            MockPin::new(false),
            MockPin::new(false),
            MockPin::new(false),
        ];
        let mut driver = Uln2003::new(pins).unwrap();

        let pattern = CoilPattern::from_bits(0, 0, 1, 1);
        driver.apply(pattern).unwrap();
        assert_eq!(levels(&driver), [false, false, true, true]);
        assert_eq!(driver.pattern(), pattern);

        driver.release().unwrap();
        assert_eq!(levels(&driver), [false; 4]);
    }

    #[test]
    fn test_pin_fault() {
        let pins = [
            MockPin::new(false),
            MockPin::new(false),
            MockPin::new(false),
            MockPin::new(false),
        ];
        let mut driver = Uln2003::new(pins).unwrap();
        driver.pins[2].fail = true;
        assert_eq!(
            driver.apply(CoilPattern::from_bits(0, 1, 1, 0)),
            Err(StepperError::PinFault)
        );
        assert_eq!(driver.pattern(), CoilPattern::RELEASED);
    }
}
