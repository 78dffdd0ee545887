//! Simple TOML parser for rig configuration
//!
//! This is a minimal TOML parser that handles only the subset needed for
//! ArcScan configuration. It does NOT support the full TOML spec and never
//! allocates.
//!
//! Supported features:
//! - Key = value pairs (string, integer, hex integer, boolean)
//! - [section] headers
//! - Comments (# ...)
//!
//! NOT supported:
//! - Arrays and inline tables
//! - Multi-line strings
//! - Dotted keys

use arcscan_core::config::{RigConfig, ScanMode, SweepConfig};
use arcscan_core::controller::ProfileKind;
use arcscan_core::traits::DistanceMode;

/// Parse error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParseError {
    /// Unknown or malformed section header
    InvalidSection,
    /// Invalid value type
    InvalidValue,
    /// Invalid pin string
    InvalidPin,
    /// Line is neither a header nor a key/value pair
    InvalidLine,
}

/// Current parsing context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Root,
    Scan,
    Servo,
    Sweep,
    Stepper,
    Tof,
    Console,
    Cloud,
}

/// Sweep timing keys seen while parsing
///
/// Applied on top of the selected preset once the whole file is read, so
/// `profile` may appear anywhere in the section.
#[derive(Debug, Clone, Copy, Default)]
struct SweepOverrides {
    profile: ProfileKind,
    lead_in_ms: Option<u32>,
    settle_ms: Option<u32>,
    step_ms: Option<u32>,
    far_hold_ms: Option<u32>,
    near_hold_ms: Option<u32>,
    countdown_secs: Option<u8>,
    countdown_first: Option<bool>,
}

impl SweepOverrides {
    fn resolve(self) -> SweepConfig {
        let mut sweep = SweepConfig::preset(self.profile);
        let t = &mut sweep.timing;
        if let Some(v) = self.lead_in_ms {
            t.lead_in_ms = v;
        }
        if let Some(v) = self.settle_ms {
            t.settle_ms = v;
        }
        if let Some(v) = self.step_ms {
            t.step_ms = v;
        }
        if let Some(v) = self.far_hold_ms {
            t.far_hold_ms = v;
        }
        if let Some(v) = self.near_hold_ms {
            t.near_hold_ms = v;
        }
        if let Some(v) = self.countdown_secs {
            t.countdown_secs = v;
        }
        if let Some(v) = self.countdown_first {
            t.countdown_first = v;
        }
        sweep
    }
}

/// Parse TOML configuration into RigConfig
pub fn parse_config(input: &str) -> Result<RigConfig, ParseError> {
    let mut config = RigConfig::new();
    let mut sweep = SweepOverrides::default();
    let mut section = Section::Root;

    for line in input.lines() {
        let line = line.trim();

        // Skip empty lines and comments
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if let Some(header) = line.strip_prefix('[') {
            let header = strip_comment(header);
            let header = header.strip_suffix(']').ok_or(ParseError::InvalidSection)?;
            section = parse_section_header(header)?;
            continue;
        }

        let (key, value) = parse_key_value(line).ok_or(ParseError::InvalidLine)?;
        apply_value(section, key, value, &mut config, &mut sweep)?;
    }

    config.sweep = sweep.resolve();
    Ok(config)
}

/// Parse a section name (without brackets)
fn parse_section_header(header: &str) -> Result<Section, ParseError> {
    match header.trim() {
        "scan" => Ok(Section::Scan),
        "servo" => Ok(Section::Servo),
        "sweep" => Ok(Section::Sweep),
        "stepper" => Ok(Section::Stepper),
        "tof" => Ok(Section::Tof),
        "console" => Ok(Section::Console),
        "cloud" => Ok(Section::Cloud),
        _ => Err(ParseError::InvalidSection),
    }
}

/// Drop a trailing `# comment` unless the `#` sits inside a string
fn strip_comment(value: &str) -> &str {
    match value.find('#') {
        Some(hash_pos) if value[..hash_pos].matches('"').count() % 2 == 0 => {
            value[..hash_pos].trim()
        }
        _ => value.trim(),
    }
}

/// Parse "key = value" line
fn parse_key_value(line: &str) -> Option<(&str, &str)> {
    let eq_pos = line.find('=')?;
    let key = line[..eq_pos].trim();
    let value = strip_comment(&line[eq_pos + 1..]);

    if key.is_empty() || value.is_empty() {
        return None;
    }

    Some((key, value))
}

/// Parse a string value (removes quotes)
fn parse_string(value: &str) -> Result<&str, ParseError> {
    if value.starts_with('"') && value.ends_with('"') && value.len() >= 2 {
        Ok(&value[1..value.len() - 1])
    } else {
        // Allow unquoted strings for simple values
        Ok(value)
    }
}

/// Parse an integer value, accepting `_` separators
fn parse_int<T: core::str::FromStr>(value: &str) -> Result<T, ParseError> {
    let mut digits: heapless::String<16> = heapless::String::new();
    for c in value.chars().filter(|c| *c != '_') {
        digits.push(c).map_err(|_| ParseError::InvalidValue)?;
    }
    digits.parse().map_err(|_| ParseError::InvalidValue)
}

/// Parse a byte written as decimal or `0x` hex
fn parse_u8(value: &str) -> Result<u8, ParseError> {
    match value.strip_prefix("0x").or_else(|| value.strip_prefix("0X")) {
        Some(hex) => u8::from_str_radix(hex, 16).map_err(|_| ParseError::InvalidValue),
        None => parse_int(value),
    }
}

/// Parse a boolean value
fn parse_bool(value: &str) -> Result<bool, ParseError> {
    match value {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(ParseError::InvalidValue),
    }
}

/// Parse a pin string like "gpio17"
fn parse_pin(value: &str) -> Result<u8, ParseError> {
    let value = parse_string(value)?;
    let num = value.strip_prefix("gpio").ok_or(ParseError::InvalidPin)?;
    num.parse().map_err(|_| ParseError::InvalidPin)
}

/// Parse scan mode
fn parse_mode(value: &str) -> Result<ScanMode, ParseError> {
    match parse_string(value)? {
        "bench" => Ok(ScanMode::Bench),
        "coordinated" => Ok(ScanMode::Coordinated),
        _ => Err(ParseError::InvalidValue),
    }
}

/// Parse sweep timing preset
fn parse_profile(value: &str) -> Result<ProfileKind, ParseError> {
    match parse_string(value)? {
        "bench" => Ok(ProfileKind::Bench),
        "fast" => Ok(ProfileKind::Fast),
        _ => Err(ParseError::InvalidValue),
    }
}

/// Parse TOF distance mode
fn parse_distance_mode(value: &str) -> Result<DistanceMode, ParseError> {
    match parse_string(value)? {
        "short" => Ok(DistanceMode::Short),
        "long" => Ok(DistanceMode::Long),
        _ => Err(ParseError::InvalidValue),
    }
}

/// Apply a key/value pair to config
fn apply_value(
    section: Section,
    key: &str,
    value: &str,
    config: &mut RigConfig,
    sweep: &mut SweepOverrides,
) -> Result<(), ParseError> {
    match section {
        Section::Scan => match key {
            "mode" => config.scan.mode = parse_mode(value)?,
            "restart" => config.scan.restart = parse_bool(value)?,
            "progress_every_deg" => config.scan.progress_every_deg = parse_int(value)?,
            _ => {} // Ignore unknown keys
        },
        Section::Servo => {
            let s = &mut config.servo;
            match key {
                "pin" => s.pin = parse_pin(value)?,
                "min_angle" => s.min_angle = parse_int(value)?,
                "max_angle" => s.max_angle = parse_int(value)?,
                "min_pulse_us" => s.min_pulse_us = parse_int(value)?,
                "max_pulse_us" => s.max_pulse_us = parse_int(value)?,
                "period_us" => s.period_us = parse_int(value)?,
                _ => {}
            }
        }
        Section::Sweep => match key {
            "profile" => sweep.profile = parse_profile(value)?,
            "lead_in_ms" => sweep.lead_in_ms = Some(parse_int(value)?),
            "settle_ms" => sweep.settle_ms = Some(parse_int(value)?),
            "step_ms" => sweep.step_ms = Some(parse_int(value)?),
            "far_hold_ms" => sweep.far_hold_ms = Some(parse_int(value)?),
            "near_hold_ms" => sweep.near_hold_ms = Some(parse_int(value)?),
            "countdown_secs" => sweep.countdown_secs = Some(parse_int(value)?),
            "countdown_first" => sweep.countdown_first = Some(parse_bool(value)?),
            _ => {}
        },
        Section::Stepper => {
            let s = &mut config.stepper;
            match key {
                "in1_pin" => s.pins[0] = parse_pin(value)?,
                "in2_pin" => s.pins[1] = parse_pin(value)?,
                "in3_pin" => s.pins[2] = parse_pin(value)?,
                "in4_pin" => s.pins[3] = parse_pin(value)?,
                "steps_per_revolution" => s.steps_per_revolution = parse_int(value)?,
                "increment_deg" => s.increment_deg = parse_int(value)?,
                "total_degrees" => s.total_degrees = parse_int(value)?,
                "step_delay_ms" => s.step_delay_ms = parse_int(value)?,
                "wait_secs" => s.wait_secs = parse_int(value)?,
                "wrap_pause_ms" => s.wrap_pause_ms = parse_int(value)?,
                _ => {}
            }
        }
        Section::Tof => {
            let t = &mut config.tof;
            match key {
                "address" => t.address = parse_u8(value)?,
                "sda_pin" => t.sda_pin = parse_pin(value)?,
                "scl_pin" => t.scl_pin = parse_pin(value)?,
                "frequency_hz" => t.frequency_hz = parse_int(value)?,
                "min_range_mm" => t.min_range_mm = parse_int(value)?,
                "max_range_mm" => t.max_range_mm = parse_int(value)?,
                "distance_mode" => t.distance_mode = parse_distance_mode(value)?,
                "timing_budget_ms" => t.timing_budget_ms = Some(parse_int(value)?),
                _ => {}
            }
        }
        Section::Console => match key {
            "baud" | "baud_rate" => config.console.baud = parse_int(value)?,
            "tx_pin" => config.console.tx_pin = parse_pin(value)?,
            "rx_pin" => config.console.rx_pin = parse_pin(value)?,
            _ => {}
        },
        Section::Cloud => match key {
            "batch_size" => config.cloud.batch_size = parse_int(value)?,
            "batch_interval_ms" => config.cloud.batch_interval_ms = parse_int(value)?,
            _ => {}
        },
        Section::Root => {
            // No root-level keys
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use arcscan_core::controller::ControllerProfile;

    #[test]
    fn test_parse_pin() {
        assert_eq!(parse_pin("gpio17").unwrap(), 17);
        assert_eq!(parse_pin("\"gpio0\"").unwrap(), 0);
        assert_eq!(parse_pin("17"), Err(ParseError::InvalidPin));
        assert_eq!(parse_pin("gpioX"), Err(ParseError::InvalidPin));
    }

    #[test]
    fn test_parse_section_header() {
        assert_eq!(parse_section_header("servo").unwrap(), Section::Servo);
        assert_eq!(parse_section_header(" tof ").unwrap(), Section::Tof);
        assert_eq!(
            parse_section_header("heater"),
            Err(ParseError::InvalidSection)
        );
    }

    #[test]
    fn test_parse_numbers() {
        assert_eq!(parse_u8("0x29").unwrap(), 0x29);
        assert_eq!(parse_u8("41").unwrap(), 41);
        assert_eq!(parse_int::<u32>("115_200").unwrap(), 115_200);
        assert_eq!(parse_int::<u8>("300"), Err(ParseError::InvalidValue));
    }

    #[test]
    fn test_inline_comment() {
        let (key, value) = parse_key_value("mode = \"bench\" # servo only").unwrap();
        assert_eq!(key, "mode");
        assert_eq!(value, "\"bench\"");

        let (_, value) = parse_key_value("label = \"a#b\"").unwrap();
        assert_eq!(value, "\"a#b\"");
    }

    #[test]
    fn test_empty_input_is_defaults() {
        assert_eq!(parse_config("").unwrap(), RigConfig::default());
    }

    #[test]
    fn test_parse_full_config() {
        let config_str = r#"
# bench rig
[scan]
mode = "coordinated"
restart = false

[servo]
pin = "gpio17"
max_angle = 170

[stepper]
in1_pin = "gpio2"
in2_pin = "gpio3"
in3_pin = "gpio4"
in4_pin = "gpio5"
increment_deg = 2

[tof]
address = 0x30
max_range_mm = 2000

[console]
baud = 115_200

[cloud]
batch_size = 8
"#;

        let config = parse_config(config_str).unwrap();
        assert_eq!(config.scan.mode, ScanMode::Coordinated);
        assert!(!config.scan.restart);
        assert_eq!(config.servo.max_angle, 170);
        assert_eq!(config.stepper.pins, [2, 3, 4, 5]);
        assert_eq!(config.stepper.increment_deg, 2);
        assert_eq!(config.tof.address, 0x30);
        assert_eq!(config.tof.max_range_mm, 2000);
        assert_eq!(config.cloud.batch_size, 8);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_profile_overrides_apply_after_preset() {
        let config_str = r#"
[sweep]
settle_ms = 40
profile = "fast"
"#;
        let config = parse_config(config_str).unwrap();
        assert_eq!(config.sweep.kind, ProfileKind::Fast);
        assert_eq!(config.sweep.timing.settle_ms, 40);
        assert_eq!(
            config.sweep.timing.step_ms,
            ControllerProfile::fast().step_ms
        );
    }

    #[test]
    fn test_sensor_tuning() {
        let config_str = r#"
[tof]
distance_mode = "short"
timing_budget_ms = 33
"#;
        let config = parse_config(config_str).unwrap();
        assert_eq!(config.tof.distance_mode, DistanceMode::Short);
        assert_eq!(config.tof.timing_budget_ms, Some(33));

        let config = parse_config("[tof]\nmax_range_mm = 1200\n").unwrap();
        assert_eq!(config.tof.distance_mode, DistanceMode::Long);
        assert_eq!(config.tof.timing_budget_ms, None);

        assert_eq!(
            parse_config("[tof]\ndistance_mode = \"medium\"\n"),
            Err(ParseError::InvalidValue)
        );
    }

    #[test]
    fn test_rejects_bad_lines() {
        assert_eq!(
            parse_config("[heater]\n"),
            Err(ParseError::InvalidSection)
        );
        assert_eq!(parse_config("[servo\n"), Err(ParseError::InvalidSection));
        assert_eq!(parse_config("[scan]\nmode\n"), Err(ParseError::InvalidLine));
        assert_eq!(
            parse_config("[scan]\nmode = \"turbo\"\n"),
            Err(ParseError::InvalidValue)
        );
    }
}
