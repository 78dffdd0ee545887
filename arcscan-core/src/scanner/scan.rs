//! Per-turn scan bookkeeping
//!
//! [`Scan`] holds everything a coordinated turn keeps track of apart from the
//! hardware: state, turntable position, progress, the point cloud and the
//! pending batch. The firmware task drives the actuators and feeds the
//! results in; every decision about which readings count, when a batch goes
//! out and when the turn is over is made here.

use super::batch::PointBatcher;
use super::point_cloud::{Point3, PointCloud};
use super::progress::ScanProgress;
use super::state::{ScanEvent, ScanState};
use crate::config::{RigConfig, MAX_BATCH_POINTS};
use crate::motion::{Turntable, TurntableMove};
use crate::traits::RangeReading;

/// Points released together to the console
pub type Batch = heapless::Vec<Point3, MAX_BATCH_POINTS>;

/// A state machine step that changed the state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StateChange {
    pub from: ScanState,
    pub to: ScanState,
}

/// What is left to publish once a turn is over
#[derive(Debug, PartialEq)]
pub struct TurnEnd {
    /// Points still held back; stream these before announcing the change
    pub batch: Option<Batch>,
    pub change: Option<StateChange>,
}

/// Coordinated scan keeping up to `N` points in memory
pub struct Scan<const N: usize> {
    state: ScanState,
    table: Turntable,
    progress: ScanProgress,
    cloud: PointCloud<N>,
    batcher: PointBatcher<MAX_BATCH_POINTS>,
    min_range_mm: u16,
    max_range_mm: u16,
    report_every_deg: u8,
    total_cycles: u16,
}

impl<const N: usize> Scan<N> {
    /// Idle scan for a rig whose motor makes `steps_per_degree` steps/°
    pub fn new(config: &RigConfig, steps_per_degree: u32, now_ms: u64) -> Self {
        let total_cycles = config.total_cycles();
        Self {
            state: ScanState::Idle,
            table: Turntable::new(
                config.stepper.increment_deg,
                config.stepper.total_degrees,
                steps_per_degree,
            ),
            progress: ScanProgress::new(total_cycles),
            cloud: PointCloud::new(),
            batcher: PointBatcher::new(
                config.cloud.batch_size as usize,
                config.cloud.batch_interval_ms as u64,
                now_ms,
            ),
            min_range_mm: config.tof.min_range_mm,
            max_range_mm: config.tof.max_range_mm,
            report_every_deg: config.scan.progress_every_deg.max(1),
            total_cycles,
        }
    }

    pub fn state(&self) -> ScanState {
        self.state
    }

    /// Progress snapshot, state included
    pub fn progress(&self) -> ScanProgress {
        self.progress
    }

    pub fn cloud(&self) -> &PointCloud<N> {
        &self.cloud
    }

    /// Feed an event to the state machine
    ///
    /// Returns the change, or `None` if the event left the state alone.
    pub fn apply(&mut self, event: ScanEvent) -> Option<StateChange> {
        let next = self.state.transition(event);
        if next == self.state {
            return None;
        }
        let change = StateChange {
            from: self.state,
            to: next,
        };
        self.state = next;
        self.progress.state = next;
        Some(change)
    }

    /// Start a turn from 0° with an empty cloud
    pub fn begin_turn(&mut self) -> Option<StateChange> {
        self.table.reset();
        self.cloud.clear();
        self.progress = ScanProgress::new(self.total_cycles);
        self.progress.state = self.state;
        self.apply(ScanEvent::Start)
    }

    /// Record the servo at `angle` and the reading taken there, if any
    ///
    /// Only distances inside the configured range window become points.
    /// Returns a batch when one is due for streaming.
    pub fn observe(
        &mut self,
        angle: u8,
        reading: Option<RangeReading>,
        now_ms: u64,
    ) -> Option<Batch> {
        self.progress.servo_angle = angle;

        let reading = reading?;
        if !reading.within(self.min_range_mm, self.max_range_mm) {
            return None;
        }
        let mm = reading.distance_mm()?;

        let phi = self.table.current_degree() as f32;
        let point = self.cloud.add_spherical(angle as f32, phi, mm as f32)?;
        self.progress.points_collected = self.cloud.total();
        self.batcher.push(point, now_ms)
    }

    /// Whether progress should be published at this servo angle
    pub fn should_report(&self, angle: u8) -> bool {
        angle % self.report_every_deg == 0
    }

    /// Plan the next turntable increment
    pub fn next_move(&mut self) -> TurntableMove {
        self.table.advance()
    }

    /// Account for a completed increment; true once the turn is over
    pub fn finish_increment(&mut self, mv: TurntableMove) -> bool {
        self.progress.current_cycle = self.progress.current_cycle.saturating_add(1);
        self.progress.stepper_angle = mv.to;
        mv.wrapped || self.progress.is_complete()
    }

    /// Release the partial batch and leave the scanning state
    pub fn end_turn(&mut self, now_ms: u64) -> TurnEnd {
        let batch = self.batcher.flush(now_ms);
        let change = self.apply(ScanEvent::TurnComplete);
        TurnEnd { batch, change }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::ScanFault;

    fn config() -> RigConfig {
        let mut config = RigConfig::new();
        config.stepper.increment_deg = 90;
        config.tof.min_range_mm = 100;
        config.tof.max_range_mm = 500;
        config.cloud.batch_size = 4;
        config.cloud.batch_interval_ms = 10_000;
        config.scan.progress_every_deg = 10;
        config
    }

    fn scanning() -> Scan<32> {
        let mut scan = Scan::new(&config(), 11, 0);
        scan.begin_turn();
        scan
    }

    #[test]
    fn test_begin_turn_starts_scanning() {
        let mut scan: Scan<32> = Scan::new(&config(), 11, 0);
        assert_eq!(
            scan.begin_turn(),
            Some(StateChange {
                from: ScanState::Idle,
                to: ScanState::Scanning,
            })
        );
        assert_eq!(scan.progress().state, ScanState::Scanning);
        assert_eq!(scan.progress().total_cycles, 4);
    }

    #[test]
    fn test_range_window_is_inclusive() {
        let mut scan = scanning();
        let readings = [
            Some(RangeReading::Distance(99)),
            Some(RangeReading::Distance(100)),
            Some(RangeReading::Distance(500)),
            Some(RangeReading::Distance(501)),
            Some(RangeReading::Distance(-5)),
            Some(RangeReading::Failed),
            None,
        ];
        for (angle, reading) in readings.into_iter().enumerate() {
            assert!(scan.observe(angle as u8, reading, 1).is_none());
        }

        assert_eq!(scan.cloud().total(), 2);
        assert_eq!(scan.progress().points_collected, 2);
        assert_eq!(scan.progress().servo_angle, 6);
        let distances: [f32; 2] = [100.0, 500.0];
        assert!(scan
            .cloud()
            .iter()
            .map(|p| p.distance_mm)
            .eq(distances.into_iter()));
    }

    #[test]
    fn test_points_take_turntable_position() {
        let mut scan = scanning();
        let mv = scan.next_move();
        assert!(!scan.finish_increment(mv));
        scan.observe(45, Some(RangeReading::Distance(200)), 1);

        let point = scan.cloud().latest().copied().unwrap();
        assert_eq!(point.theta, 45.0);
        assert_eq!(point.phi, 90.0);
    }

    #[test]
    fn test_full_batch_released_mid_turn() {
        let mut scan = scanning();
        for angle in 0..3 {
            assert!(scan
                .observe(angle, Some(RangeReading::Distance(200)), 1)
                .is_none());
        }
        let batch = scan.observe(3, Some(RangeReading::Distance(200)), 2).unwrap();
        assert_eq!(batch.len(), 4);
    }

    #[test]
    fn test_turn_ends_on_wrap() {
        let mut scan = scanning();
        let mut done = [false; 4];
        for slot in done.iter_mut() {
            let mv = scan.next_move();
            assert_eq!(mv.steps, 90 * 11);
            *slot = scan.finish_increment(mv);
        }
        assert_eq!(done, [false, false, false, true]);
        assert_eq!(scan.progress().current_cycle, 4);
        assert_eq!(scan.progress().stepper_angle, 360);
        assert!(scan.progress().is_complete());
    }

    #[test]
    fn test_turn_ends_when_cycles_complete() {
        let mut scan = scanning();
        // Table not wrapped, but every counted increment is done
        let mv = TurntableMove {
            from: 0,
            to: 90,
            steps: 990,
            wrapped: false,
        };
        assert!(!scan.finish_increment(mv));
        assert!(!scan.finish_increment(mv));
        assert!(!scan.finish_increment(mv));
        assert!(scan.finish_increment(mv));
    }

    #[test]
    fn test_partial_batch_flushed_with_turn_end() {
        let mut scan = scanning();
        for angle in 0..3 {
            scan.observe(angle, Some(RangeReading::Distance(300)), 1);
        }

        let end = scan.end_turn(5);
        assert_eq!(end.batch.map(|b| b.len()), Some(3));
        assert_eq!(
            end.change,
            Some(StateChange {
                from: ScanState::Scanning,
                to: ScanState::Idle,
            })
        );
        assert_eq!(scan.state(), ScanState::Idle);

        // Nothing left for a second flush
        assert_eq!(scan.end_turn(6), TurnEnd { batch: None, change: None });
    }

    #[test]
    fn test_next_turn_starts_clean() {
        let mut scan = scanning();
        scan.observe(10, Some(RangeReading::Distance(300)), 1);
        let mv = scan.next_move();
        scan.finish_increment(mv);
        scan.end_turn(2);

        scan.begin_turn();
        assert!(scan.cloud().is_empty());
        assert_eq!(scan.progress().current_cycle, 0);
        assert_eq!(scan.progress().points_collected, 0);
        scan.observe(10, Some(RangeReading::Distance(300)), 3);
        assert_eq!(scan.cloud().latest().map(|p| p.phi), Some(0.0));
    }

    #[test]
    fn test_fault_sticks() {
        let mut scan = scanning();
        let change = scan.apply(ScanEvent::Fault(ScanFault::Stepper));
        assert_eq!(change.map(|c| c.to), Some(ScanState::Error(ScanFault::Stepper)));
        assert_eq!(scan.end_turn(1).change, None);
        assert!(scan.begin_turn().is_none());
        assert!(scan.state().is_error());
    }

    #[test]
    fn test_progress_cadence() {
        let scan = scanning();
        assert!(scan.should_report(0));
        assert!(scan.should_report(90));
        assert!(!scan.should_report(95));

        let mut config = config();
        config.scan.progress_every_deg = 0;
        let scan: Scan<4> = Scan::new(&config, 11, 0);
        assert!(scan.should_report(7));
    }
}
