//! Stepper coil bank
//!
//! Four push-pull GPIO outputs feeding the ULN2003 inputs, all driven low
//! at construction so no coil is energized at boot.

use arcscan_core::traits::StepperError;
use arcscan_drivers::stepper::Uln2003;
use embassy_rp::gpio::{AnyPin, Level, Output};
use embassy_rp::Peri;

/// ULN2003 driver over RP2040 GPIO outputs
pub type CoilBank = Uln2003<Output<'static>>;

/// Build a coil bank from IN1..IN4
pub fn coil_bank(pins: [Peri<'static, AnyPin>; 4]) -> Result<CoilBank, StepperError> {
    let [in1, in2, in3, in4] = pins;
    Uln2003::new([
        Output::new(in1, Level::Low),
        Output::new(in2, Level::Low),
        Output::new(in3, Level::Low),
        Output::new(in4, Level::Low),
    ])
}
