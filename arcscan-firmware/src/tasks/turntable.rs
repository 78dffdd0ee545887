//! Turntable task
//!
//! Standalone stepper loop for bench mode. It has no link to the servo
//! controller: each increment waits long enough for one controller cycle,
//! then turns the table by one slice.

use arcscan_core::config::RigConfig;
use arcscan_core::console::ConsoleLine;
use arcscan_core::motion::Turntable;
use arcscan_core::traits::Direction;
use defmt::*;
use embassy_time::{Delay, Timer};

use crate::board::RigStepper;
use crate::console::emit;

/// Turntable task - owns the stepper
#[embassy_executor::task]
pub async fn turntable_task(mut motor: RigStepper, config: RigConfig) {
    info!("Turntable task started");

    let stepper = config.stepper;
    let mut table = Turntable::new(
        stepper.increment_deg,
        stepper.total_degrees,
        motor.steps_per_degree(),
    );

    let cycle_ms = config.controller_cycle_ms();
    if (stepper.wait_secs as u32) * 1000 < cycle_ms {
        warn!(
            "Turntable wait {}s is shorter than the {} ms controller cycle",
            stepper.wait_secs, cycle_ms
        );
    }

    announce(&config, motor.steps_per_degree()).await;

    loop {
        emit(ConsoleLine::Waiting(stepper.wait_secs)).await;
        for remaining in (1..=stepper.wait_secs).rev() {
            emit(ConsoleLine::WaitCountdown(remaining)).await;
            Timer::after_secs(1).await;
        }
        emit(ConsoleLine::WaitComplete).await;
        emit(ConsoleLine::Blank).await;

        let mv = table.advance();
        emit(ConsoleLine::Moving {
            from: mv.from,
            to: mv.to,
        })
        .await;

        if let Err(e) = motor.step(&mut Delay, mv.steps, Direction::Clockwise).await {
            error!("Turntable move {} -> {} failed: {:?}", mv.from, mv.to, e);
        }
        emit(ConsoleLine::StepperAt(mv.to)).await;

        if mv.wrapped {
            emit(ConsoleLine::Blank).await;
            emit(ConsoleLine::TurnComplete {
                total_degrees: stepper.total_degrees,
            })
            .await;
            emit(ConsoleLine::Resetting).await;
            emit(ConsoleLine::Blank).await;
            Timer::after_millis(stepper.wrap_pause_ms as u64).await;
        }
    }
}

/// Print the turntable banner
async fn announce(config: &RigConfig, steps_per_degree: u32) {
    let stepper = &config.stepper;
    emit(ConsoleLine::StepperReady).await;
    emit(ConsoleLine::StepperModel {
        total_degrees: stepper.total_degrees,
    })
    .await;
    emit(ConsoleLine::StepperPattern {
        wait_secs: stepper.wait_secs,
        increment_deg: stepper.increment_deg,
    })
    .await;
    emit(ConsoleLine::StepsPerDegree(steps_per_degree)).await;
    emit(ConsoleLine::StepperHomed).await;
    emit(ConsoleLine::PatternStarting).await;
    emit(ConsoleLine::Blank).await;
}
