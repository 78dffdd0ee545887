//! Rig configuration structures

use crate::controller::{ControllerProfile, ProfileKind};
use crate::motion::steps_per_degree;
use crate::traits::DistanceMode;

/// Largest point batch the console streamer can buffer
pub const MAX_BATCH_POINTS: usize = 16;

/// Highest GPIO number on the target
pub const MAX_GPIO: u8 = 29;

/// Mechanical travel of the servo; the pulse range maps onto 0..=180°
pub const MAX_SERVO_ANGLE: u8 = 180;

/// Largest accepted steps_per_revolution
///
/// Keeps a full turn of steps (total_degrees × steps/degree) inside a u32.
pub const MAX_STEPS_PER_REVOLUTION: u32 = 1 << 20;

/// Which programs the firmware runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ScanMode {
    /// Independent servo controller and turntable loops, synchronized only
    /// by matching delays
    #[default]
    Bench,
    /// A single scanner owns both actuators and builds a point cloud
    Coordinated,
}

/// Top-level scan behaviour
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ScanConfig {
    pub mode: ScanMode,
    /// Start a new turn automatically after a full rotation (coordinated mode)
    pub restart: bool,
    /// Report progress whenever the servo angle is a multiple of this
    pub progress_every_deg: u8,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            mode: ScanMode::Bench,
            restart: true,
            progress_every_deg: 10,
        }
    }
}

/// Hobby servo wiring and pulse range
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ServoConfig {
    /// PWM output pin
    pub pin: u8,
    /// Lowest commanded angle
    pub min_angle: u8,
    /// Highest commanded angle
    pub max_angle: u8,
    /// Pulse width at 0° (µs)
    pub min_pulse_us: u16,
    /// Pulse width at the servo's full travel (µs)
    pub max_pulse_us: u16,
    /// PWM frame period (µs), 20000 for 50 Hz
    pub period_us: u16,
}

impl Default for ServoConfig {
    fn default() -> Self {
        Self {
            pin: 17,
            min_angle: 0,
            max_angle: 180,
            min_pulse_us: 500,
            max_pulse_us: 2500,
            period_us: 20_000,
        }
    }
}

/// Servo controller timing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SweepConfig {
    /// Preset the timings were derived from
    pub kind: ProfileKind,
    /// Effective timings, preset plus overrides
    pub timing: ControllerProfile,
}

impl SweepConfig {
    /// Sweep config for a preset
    pub fn preset(kind: ProfileKind) -> Self {
        Self {
            kind,
            timing: ControllerProfile::for_kind(kind),
        }
    }
}

/// 28BYJ-48 turntable stepper
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StepperConfig {
    /// IN1..IN4 coil pins
    pub pins: [u8; 4],
    /// Half-steps per output revolution
    pub steps_per_revolution: u32,
    /// Degrees per turntable increment
    pub increment_deg: u16,
    /// Degrees in a full turn
    pub total_degrees: u16,
    /// Delay between half-steps (ms)
    pub step_delay_ms: u32,
    /// Countdown before each increment in bench mode (s)
    pub wait_secs: u16,
    /// Pause after a full turn (ms)
    pub wrap_pause_ms: u32,
}

impl StepperConfig {
    /// Whole steps per degree for this motor
    pub fn steps_per_degree(&self) -> u32 {
        steps_per_degree(self.steps_per_revolution)
    }
}

impl Default for StepperConfig {
    fn default() -> Self {
        Self {
            pins: [10, 11, 12, 13],
            steps_per_revolution: 4096,
            increment_deg: 1,
            total_degrees: 360,
            step_delay_ms: 2,
            wait_secs: 46,
            wrap_pause_ms: 2000,
        }
    }
}

/// VL53L1X time-of-flight sensor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TofConfig {
    /// 7-bit I2C address
    pub address: u8,
    pub sda_pin: u8,
    pub scl_pin: u8,
    /// I2C bus frequency (Hz)
    pub frequency_hz: u32,
    /// Shortest distance accepted into the point cloud (mm)
    pub min_range_mm: u16,
    /// Longest distance accepted into the point cloud (mm)
    pub max_range_mm: u16,
    pub distance_mode: DistanceMode,
    /// Ranging timing budget (ms); `None` keeps the sensor default
    pub timing_budget_ms: Option<u16>,
}

impl Default for TofConfig {
    fn default() -> Self {
        Self {
            address: 0x29,
            sda_pin: 14,
            scl_pin: 15,
            frequency_hz: 400_000,
            min_range_mm: 10,
            max_range_mm: 4000,
            distance_mode: DistanceMode::Long,
            timing_budget_ms: None,
        }
    }
}

/// Serial console UART
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ConsoleConfig {
    pub baud: u32,
    pub tx_pin: u8,
    pub rx_pin: u8,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            baud: 115_200,
            tx_pin: 0,
            rx_pin: 1,
        }
    }
}

/// Point streaming
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CloudConfig {
    /// Points per streamed batch
    pub batch_size: u8,
    /// Longest a partial batch is held back (ms)
    pub batch_interval_ms: u32,
}

impl Default for CloudConfig {
    fn default() -> Self {
        Self {
            batch_size: 10,
            batch_interval_ms: 100,
        }
    }
}

/// Configuration validation errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// min_angle must be below max_angle, and max_angle within servo travel
    InvalidAngleRange,
    /// Pulse range empty or longer than the PWM period
    InvalidPulseRange,
    /// Settle delay or step delay is zero
    InvalidSweepTiming,
    /// steps_per_revolution yields zero steps per degree or exceeds
    /// [`MAX_STEPS_PER_REVOLUTION`]
    InvalidStepsPerRevolution,
    /// increment_deg is zero or larger than a full turn
    InvalidIncrement,
    /// min_range_mm must be below max_range_mm
    InvalidRangeWindow,
    /// Batch size zero or above [`MAX_BATCH_POINTS`]
    InvalidBatchSize,
    /// Baud rate is zero
    InvalidBaud,
    /// Pin number out of range
    InvalidPin(u8),
    /// Two peripherals share a pin
    PinConflict(u8),
}

/// Complete rig configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RigConfig {
    pub scan: ScanConfig,
    pub servo: ServoConfig,
    pub sweep: SweepConfig,
    pub stepper: StepperConfig,
    pub tof: TofConfig,
    pub console: ConsoleConfig,
    pub cloud: CloudConfig,
}

impl RigConfig {
    /// Create a config with stock defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Check the configuration for inconsistent values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.servo.min_angle >= self.servo.max_angle
            || self.servo.max_angle > MAX_SERVO_ANGLE
        {
            return Err(ConfigError::InvalidAngleRange);
        }
        if self.servo.min_pulse_us >= self.servo.max_pulse_us
            || self.servo.max_pulse_us > self.servo.period_us
        {
            return Err(ConfigError::InvalidPulseRange);
        }
        let timing = &self.sweep.timing;
        if timing.settle_ms == 0 || timing.step_ms == 0 {
            return Err(ConfigError::InvalidSweepTiming);
        }
        if self.stepper.steps_per_degree() == 0
            || self.stepper.steps_per_revolution > MAX_STEPS_PER_REVOLUTION
        {
            return Err(ConfigError::InvalidStepsPerRevolution);
        }
        if self.stepper.increment_deg == 0
            || self.stepper.increment_deg > self.stepper.total_degrees
        {
            return Err(ConfigError::InvalidIncrement);
        }
        if self.tof.min_range_mm >= self.tof.max_range_mm {
            return Err(ConfigError::InvalidRangeWindow);
        }
        if self.cloud.batch_size == 0 || self.cloud.batch_size as usize > MAX_BATCH_POINTS {
            return Err(ConfigError::InvalidBatchSize);
        }
        if self.console.baud == 0 {
            return Err(ConfigError::InvalidBaud);
        }
        self.validate_pins()
    }

    fn validate_pins(&self) -> Result<(), ConfigError> {
        let pins = self.pins();
        for (i, &pin) in pins.iter().enumerate() {
            if pin > MAX_GPIO {
                return Err(ConfigError::InvalidPin(pin));
            }
            if pins[i + 1..].contains(&pin) {
                return Err(ConfigError::PinConflict(pin));
            }
        }
        Ok(())
    }

    /// Every GPIO claimed by the rig
    pub fn pins(&self) -> [u8; 9] {
        let s = &self.stepper.pins;
        [
            self.servo.pin,
            s[0],
            s[1],
            s[2],
            s[3],
            self.tof.sda_pin,
            self.tof.scl_pin,
            self.console.tx_pin,
            self.console.rx_pin,
        ]
    }

    /// Turntable increments in one full turn
    pub fn total_cycles(&self) -> u16 {
        self.stepper
            .total_degrees
            .div_ceil(self.stepper.increment_deg.max(1))
    }

    /// Nominal servo controller loop duration (ms)
    pub fn controller_cycle_ms(&self) -> u32 {
        self.sweep
            .timing
            .cycle_time_ms(self.servo.min_angle, self.servo.max_angle)
    }
}
