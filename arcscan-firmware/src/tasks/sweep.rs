//! Servo controller task
//!
//! Runs the bench controller loop: sweep the sensor across the arc reading
//! at every angle, hold at the far end, sweep back and wait out the
//! turntable move. The phases come from the configured timing profile.

use arcscan_core::config::RigConfig;
use arcscan_core::console::ConsoleLine;
use arcscan_core::controller::{ControllerProfile, Countdown, CyclePlan, Phase};
use arcscan_core::motion::Sweep;
use arcscan_core::traits::{RangeReading, ServoDriver};
use defmt::*;
use embassy_time::Timer;

use crate::board::{RigSensor, RigServo};
use crate::console::emit;

/// Servo controller task - owns the servo and the TOF sensor
#[embassy_executor::task]
pub async fn sweep_task(mut servo: RigServo, mut sensor: RigSensor, config: RigConfig) {
    info!("Sweep task started");

    let timing = config.sweep.timing;
    let plan = CyclePlan::for_profile(&timing, config.servo.min_angle, config.servo.max_angle);
    debug!(
        "Controller cycle: {} phases, {} ms",
        plan.len(),
        config.controller_cycle_ms()
    );

    loop {
        let mut first = true;
        for planned in plan.iter() {
            if let Some(number) = planned.number {
                if first {
                    emit(ConsoleLine::Blank).await;
                    first = false;
                }
                emit(ConsoleLine::PhaseHeader {
                    number,
                    phase: planned.phase,
                })
                .await;
            }
            run_phase(&mut servo, &mut sensor, &timing, planned.phase).await;
        }

        emit(ConsoleLine::CycleComplete).await;
        emit(ConsoleLine::Blank).await;
    }
}

async fn run_phase(
    servo: &mut RigServo,
    sensor: &mut RigSensor,
    timing: &ControllerProfile,
    phase: Phase,
) {
    match phase {
        Phase::LeadIn { ms } | Phase::Hold { ms, .. } => {
            Timer::after_millis(ms as u64).await;
        }
        Phase::Sweep { from, to } => {
            for angle in Sweep::new(from, to) {
                move_servo(servo, angle);
                emit(ConsoleLine::ServoAt(angle)).await;
                Timer::after_millis(timing.settle_ms as u64).await;

                match poll_reading(sensor).await {
                    Some(RangeReading::Distance(mm)) => emit(ConsoleLine::Distance(mm)).await,
                    Some(RangeReading::Failed) => emit(ConsoleLine::ReadFailed).await,
                    None => {}
                }

                Timer::after_millis(timing.remainder_ms() as u64).await;
            }
        }
        Phase::Countdown { seconds, .. } => {
            for remaining in Countdown::new(seconds) {
                emit(ConsoleLine::StepperPause(remaining)).await;
                Timer::after_secs(1).await;
            }
        }
    }
}

/// Command a servo angle, logging rather than stopping on a PWM fault
pub(crate) fn move_servo(servo: &mut RigServo, angle: u8) {
    if let Err(e) = servo.write_angle(angle) {
        warn!("Servo write to {} failed: {:?}", angle, e);
    }
}

/// Take the pending sample if one is ready
///
/// Returns `None` when no new sample is available. The interrupt is
/// cleared after every sample so the sensor can signal the next one.
pub(crate) async fn poll_reading(sensor: &mut RigSensor) -> Option<RangeReading> {
    match sensor.data_ready().await {
        Ok(true) => {}
        Ok(false) => return None,
        Err(e) => {
            warn!("TOF data ready check failed: {:?}", e);
            return None;
        }
    }

    let reading = sensor.reading().await;
    if let Err(e) = sensor.clear_interrupt().await {
        warn!("TOF interrupt clear failed: {:?}", e);
    }
    Some(reading)
}
