//! Serial console lines
//!
//! Every human-readable status line the rig prints. Lines carry only data;
//! the firmware renders them with [`core::fmt::Display`] and appends a line
//! terminator unless [`ConsoleLine::is_terminated`] says otherwise.

use core::fmt;

use crate::controller::Phase;
use crate::scanner::{Bounds, Point3, ScanProgress, ScanState};

/// A single console status line
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConsoleLine {
    /// Empty separator line
    Blank,

    // Servo controller boot
    ControllerStarting,
    SensorNotFound,
    RangingFailed,
    SensorReady,
    RangingStarted,
    ControllerReady,
    Wiring { sda: u8, scl: u8, servo: u8 },
    SweepPattern {
        min: u8,
        max: u8,
        hold_ms: u32,
        countdown_secs: u8,
    },

    // Servo controller loop
    PhaseHeader { number: u8, phase: Phase },
    /// Left open so the reading lands on the same console line
    ServoAt(u8),
    Distance(i16),
    ReadFailed,
    StepperPause(u8),
    CycleComplete,

    // Turntable loop
    StepperReady,
    StepperModel { total_degrees: u16 },
    StepperPattern { wait_secs: u16, increment_deg: u16 },
    StepsPerDegree(u32),
    StepperHomed,
    PatternStarting,
    Waiting(u16),
    WaitCountdown(u16),
    WaitComplete,
    Moving { from: u16, to: u16 },
    StepperAt(u16),
    TurnComplete { total_degrees: u16 },
    Resetting,

    // Coordinated scanner
    ScannerReady { cycles: u16 },
    StateChange { from: ScanState, to: ScanState },
    Progress(ScanProgress),
    Batch(u8),
    Point(Point3),
    ScanFinished { points: u32 },
    CloudBounds(Bounds),
    CloudCenter([f32; 3]),
}

impl ConsoleLine {
    /// Whether a line terminator follows this line
    pub fn is_terminated(&self) -> bool {
        !matches!(self, ConsoleLine::ServoAt(_))
    }
}

/// Write a duration as "1 second", "5 seconds" or "500 ms"
fn write_duration(f: &mut fmt::Formatter<'_>, ms: u32) -> fmt::Result {
    if ms % 1000 != 0 {
        return write!(f, "{} ms", ms);
    }
    match ms / 1000 {
        1 => write!(f, "1 second"),
        secs => write!(f, "{} seconds", secs),
    }
}

fn write_short_duration(f: &mut fmt::Formatter<'_>, ms: u32) -> fmt::Result {
    if ms % 1000 == 0 {
        write!(f, "{}s", ms / 1000)
    } else {
        write!(f, "{}ms", ms)
    }
}

impl fmt::Display for ConsoleLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use ConsoleLine::*;

        match *self {
            Blank => Ok(()),

            ControllerStarting => write!(f, "RP2040 Servo + TOF Controller Starting..."),
            SensorNotFound => write!(f, "Error: VL53L1X sensor not found!"),
            RangingFailed => write!(f, "Couldn't start ranging"),
            SensorReady => write!(f, "VL53L1X sensor initialized successfully!"),
            RangingStarted => write!(f, "TOF sensor ranging started"),
            ControllerReady => write!(f, "=== RP2040 Servo + TOF Controller Ready ==="),
            Wiring { sda, scl, servo } => write!(
                f,
                "Hardware: SDA=Pin{}, SCL=Pin{}, Servo=Pin{}",
                sda, scl, servo
            ),
            SweepPattern {
                min,
                max,
                hold_ms,
                countdown_secs,
            } => {
                write!(f, "Scanning Pattern: {}°→{}° (pause ", min, max)?;
                write_short_duration(f, hold_ms)?;
                write!(
                    f,
                    ") → {}°→{}° (pause {}s for stepper)",
                    max, min, countdown_secs
                )
            }

            PhaseHeader { number, phase } => {
                write!(f, "=== PHASE {}: ", number)?;
                match phase {
                    Phase::Sweep { from, to } => {
                        write!(f, "Sweeping from {}° to {}°", from, to)?;
                    }
                    Phase::Hold { at, ms } => {
                        write!(f, "Pausing at {}° for ", at)?;
                        write_duration(f, ms)?;
                    }
                    Phase::Countdown { at, seconds } => {
                        write!(f, "Pausing at {}° for ", at)?;
                        write_duration(f, seconds as u32 * 1000)?;
                        write!(f, " (stepper motor time)")?;
                    }
                    Phase::LeadIn { ms } => {
                        write!(f, "Waiting ")?;
                        write_duration(f, ms)?;
                    }
                }
                write!(f, " ===")
            }
            ServoAt(angle) => write!(f, "Servo at {} degrees - ", angle),
            Distance(mm) => write!(f, "Distance: {} mm", mm),
            ReadFailed => write!(f, "TOF: Failed to get reading!"),
            StepperPause(secs) => write!(
                f,
                "Stepper pause countdown: {} seconds remaining...",
                secs
            ),
            CycleComplete => write!(f, "=== Scan cycle complete! Starting next cycle... ==="),

            StepperReady => write!(f, "=== RP2040 Stepper Motor Controller Ready ==="),
            StepperModel { total_degrees } => write!(
                f,
                "28BYJ-48 Stepper Motor - {}° Scanning Pattern",
                total_degrees
            ),
            StepperPattern {
                wait_secs,
                increment_deg,
            } => write!(
                f,
                "Pattern: Initialize to 0° → Wait {}s → Move {}° → Repeat",
                wait_secs, increment_deg
            ),
            StepsPerDegree(steps) => write!(f, "Steps per degree: {}", steps),
            StepperHomed => write!(f, "Stepper initialized to 0 degrees"),
            PatternStarting => write!(f, "Starting scanning pattern..."),
            Waiting(secs) => write!(f, "Waiting {} seconds for servo scan cycle...", secs),
            WaitCountdown(secs) => write!(f, "Countdown: {} seconds remaining", secs),
            WaitComplete => write!(f, "Wait complete!"),
            Moving { from, to } => write!(f, "=== Moving from {}° to {}° ===", from, to),
            StepperAt(deg) => write!(f, "Stepper now at {}°", deg),
            TurnComplete { total_degrees } => {
                write!(f, "=== {}° SCAN COMPLETE! ===", total_degrees)
            }
            Resetting => write!(f, "Resetting to 0° and starting new cycle..."),

            ScannerReady { cycles } => write!(
                f,
                "=== Coordinated scan ready: {} increments per turn ===",
                cycles
            ),
            StateChange { from, to } => {
                write!(f, "Scanner state: {} → {}", from.name(), to.name())
            }
            Progress(p) => write!(
                f,
                "Progress: cycle {}/{} ({}%) servo {}° stepper {}° points {}",
                p.current_cycle,
                p.total_cycles,
                p.percent(),
                p.servo_angle,
                p.stepper_angle,
                p.points_collected
            ),
            Batch(count) => write!(f, "BATCH {}", count),
            Point(p) => write!(f, "P {:.1} {:.1} {:.1}", p.x, p.y, p.z),
            ScanFinished { points } => {
                write!(f, "Full scan complete! Total points: {}", points)
            }
            CloudBounds(b) => write!(
                f,
                "Bounds: min ({:.1}, {:.1}, {:.1}) max ({:.1}, {:.1}, {:.1})",
                b.min[0], b.min[1], b.min[2], b.max[0], b.max[1], b.max[2]
            ),
            CloudCenter(c) => write!(f, "Center: ({:.1}, {:.1}, {:.1})", c[0], c[1], c[2]),
        }
    }
}
