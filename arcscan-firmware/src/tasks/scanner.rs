//! Coordinated scanner task
//!
//! A single task owns the servo, the sensor and the turntable. For every
//! turntable increment it sweeps the arc out and back and hands each reading
//! to the scan bookkeeping, then moves the table on. After a full turn it
//! prints a summary of the cloud and, if configured, starts over.

use arcscan_core::config::RigConfig;
use arcscan_core::console::ConsoleLine;
use arcscan_core::motion::Sweep;
use arcscan_core::scanner::{Point3, Scan, ScanEvent, ScanFault, StateChange};
use arcscan_core::traits::{Direction, ServoDriver};
use defmt::*;
use embassy_time::{Delay, Instant, Timer};

use crate::board::{RigSensor, RigServo, RigStepper};
use crate::channels::SCAN_PROGRESS;
use crate::console::{emit, try_emit};
use crate::tasks::halt;
use crate::tasks::sweep::poll_reading;

/// Points kept in memory for the turn summary
const CLOUD_CAPACITY: usize = 512;

/// Everything the scanner task owns
struct Scanner {
    servo: RigServo,
    sensor: RigSensor,
    motor: RigStepper,
    config: RigConfig,
    scan: Scan<CLOUD_CAPACITY>,
}

/// Coordinated scanner task
#[embassy_executor::task]
pub async fn scanner_task(
    servo: RigServo,
    sensor: RigSensor,
    motor: RigStepper,
    config: RigConfig,
) {
    info!("Scanner task started");

    let scan = Scan::new(&config, motor.steps_per_degree(), now_ms());
    let mut scanner = Scanner {
        servo,
        sensor,
        motor,
        config,
        scan,
    };

    emit(ConsoleLine::ScannerReady {
        cycles: config.total_cycles(),
    })
    .await;

    loop {
        match scanner.run_turn().await {
            Ok(()) => scanner.summarize().await,
            Err(fault) => {
                error!("Scan stopped: {:?}", fault);
                let change = scanner.scan.apply(ScanEvent::Fault(fault));
                announce(change).await;
                scanner.park();
                halt().await;
            }
        }

        if !scanner.config.scan.restart {
            info!("Scan finished, restart disabled");
            halt().await;
        }
        Timer::after_millis(scanner.config.stepper.wrap_pause_ms as u64).await;
    }
}

impl Scanner {
    /// Scan one full turn of the table
    async fn run_turn(&mut self) -> Result<(), ScanFault> {
        announce(self.scan.begin_turn()).await;

        let servo = self.config.servo;
        let timing = self.config.sweep.timing;

        loop {
            self.sweep(servo.min_angle, servo.max_angle).await?;
            Timer::after_millis(timing.far_hold_ms as u64).await;
            self.sweep(servo.max_angle, servo.min_angle).await?;
            Timer::after_millis(timing.near_hold_ms as u64).await;

            let mv = self.scan.next_move();
            trace!("Turntable {} -> {}", mv.from, mv.to);
            self.motor
                .step(&mut Delay, mv.steps, Direction::Clockwise)
                .await
                .map_err(|_| ScanFault::Stepper)?;

            let done = self.scan.finish_increment(mv);
            self.report().await;
            if done {
                break;
            }
        }

        let end = self.scan.end_turn(now_ms());
        if let Some(batch) = end.batch {
            stream_batch(&batch).await;
        }
        announce(end.change).await;
        Ok(())
    }

    /// Sweep the arc once, reading at every angle
    async fn sweep(&mut self, from: u8, to: u8) -> Result<(), ScanFault> {
        let timing = self.config.sweep.timing;

        for angle in Sweep::new(from, to) {
            self.servo
                .write_angle(angle)
                .map_err(|_| ScanFault::Servo)?;
            Timer::after_millis(timing.settle_ms as u64).await;

            let reading = poll_reading(&mut self.sensor).await;
            if let Some(batch) = self.scan.observe(angle, reading, now_ms()) {
                stream_batch(&batch).await;
            }

            if self.scan.should_report(angle) {
                self.report().await;
            }
            Timer::after_millis(timing.remainder_ms() as u64).await;
        }
        Ok(())
    }

    /// Publish progress to the signal and the console
    async fn report(&self) {
        let progress = self.scan.progress();
        SCAN_PROGRESS.signal(progress);
        emit(ConsoleLine::Progress(progress)).await;
    }

    /// Print the end-of-turn summary
    async fn summarize(&self) {
        let cloud = self.scan.cloud();
        let points = cloud.total();
        info!("Turn complete: {} points", points);
        emit(ConsoleLine::ScanFinished { points }).await;
        if !cloud.is_empty() {
            emit(ConsoleLine::CloudBounds(cloud.bounds())).await;
            emit(ConsoleLine::CloudCenter(cloud.centroid())).await;
        }
    }

    /// Leave the actuators safe after a fault
    fn park(&mut self) {
        if let Err(e) = self.motor.release() {
            warn!("Failed to release stepper: {:?}", e);
        }
        if let Err(e) = self.servo.detach() {
            warn!("Failed to detach servo: {:?}", e);
        }
    }
}

/// Log and print a state change
async fn announce(change: Option<StateChange>) {
    let Some(StateChange { from, to }) = change else {
        return;
    };
    debug!("Scanner {} -> {}", from.name(), to.name());
    emit(ConsoleLine::StateChange { from, to }).await;
}

/// Stream one batch of points to the console
async fn stream_batch(batch: &[Point3]) {
    emit(ConsoleLine::Batch(batch.len() as u8)).await;
    for point in batch {
        try_emit(ConsoleLine::Point(*point));
    }
}

fn now_ms() -> u64 {
    Instant::now().as_millis()
}
