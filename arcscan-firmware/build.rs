//! Links the RP2040 image and checks rig.toml before compiling it in

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

fn main() {
    setup_linker();
    validate_config();
}

/// Stage memory.x and pass the cortex-m-rt, RP2040 and defmt scripts
fn setup_linker() {
    let out = PathBuf::from(env::var("OUT_DIR").expect("OUT_DIR is set by cargo"));
    fs::write(out.join("memory.x"), include_bytes!("memory.x")).expect("write memory.x");
    println!("cargo:rustc-link-search={}", out.display());

    let mut scripts = vec!["--nmagic", "-Tlink.x", "-Tlink-rp.x"];
    if env::var_os("CARGO_FEATURE_DEFMT").is_some() {
        scripts.push("-Tdefmt.x");
    }
    for arg in scripts {
        println!("cargo:rustc-link-arg-bins={}", arg);
    }

    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Reject a broken rig.toml before the firmware is built
///
/// The firmware parser only knows a flat TOML subset and falls back to
/// defaults on error, so mistakes are caught here where they can fail the
/// build.
fn validate_config() {
    const PATH: &str = "rig.toml";
    println!("cargo:rerun-if-changed={}", PATH);

    let text = fs::read_to_string(Path::new(PATH)).unwrap_or_else(|e| {
        report(
            "cannot read rig.toml",
            &[
                e.to_string(),
                "the firmware embeds arcscan-firmware/rig.toml".to_string(),
            ],
        )
    });
    let config: toml::Value = toml::from_str(&text).unwrap_or_else(|e| {
        let lines: Vec<String> = e.to_string().lines().map(str::to_string).collect();
        report("rig.toml is not valid TOML", &lines)
    });

    let mut errors = Vec::new();
    validate_sections(&config, &mut errors);
    validate_choices(&config, &mut errors);
    validate_pins(&config, &mut errors);
    validate_ranges(&config, &mut errors);
    if !errors.is_empty() {
        report("rig.toml has invalid values", &errors);
    }

    println!("cargo:warning=rig.toml validated successfully");
}

/// Abort the build with a titled list of problems
fn report(title: &str, lines: &[String]) -> ! {
    let mut msg = format!("\n{}\n{}\n", title, "-".repeat(title.len()));
    for line in lines {
        msg.push_str("  * ");
        msg.push_str(line);
        msg.push('\n');
    }
    panic!("{}", msg);
}

const SECTIONS: [&str; 7] = ["scan", "servo", "sweep", "stepper", "tof", "console", "cloud"];

/// Only known sections, and each must be a table
fn validate_sections(config: &toml::Value, errors: &mut Vec<String>) {
    let Some(table) = config.as_table() else {
        errors.push("rig.toml must be a table".to_string());
        return;
    };

    for (name, value) in table {
        if !SECTIONS.contains(&name.as_str()) {
            errors.push(format!("Unknown section [{}]", name));
        } else if !value.is_table() {
            errors.push(format!("[{}] must be a table", name));
        } else if value
            .as_table()
            .is_some_and(|t| t.values().any(|v| v.is_array() || v.is_table()))
        {
            errors.push(format!("[{}] may only hold plain values", name));
        }
    }
}

fn get<'a>(config: &'a toml::Value, section: &str, key: &str) -> Option<&'a toml::Value> {
    config.get(section)?.get(key)
}

fn get_int(config: &toml::Value, section: &str, key: &str) -> Option<i64> {
    get(config, section, key)?.as_integer()
}

/// String enums
fn validate_choices(config: &toml::Value, errors: &mut Vec<String>) {
    let choices: [(&str, &str, &[&str]); 3] = [
        ("scan", "mode", &["bench", "coordinated"]),
        ("sweep", "profile", &["bench", "fast"]),
        ("tof", "distance_mode", &["short", "long"]),
    ];

    for (section, key, allowed) in choices {
        match get(config, section, key) {
            None => {}
            Some(toml::Value::String(s)) if allowed.contains(&s.as_str()) => {}
            Some(_) => errors.push(format!(
                "[{}] {} must be one of: {}",
                section,
                key,
                allowed.join(", ")
            )),
        }
    }
}

/// Pin strings look like "gpioNN" with NN in 0..=29, used once each
fn validate_pins(config: &toml::Value, errors: &mut Vec<String>) {
    let pin_keys = [
        ("servo", "pin"),
        ("stepper", "in1_pin"),
        ("stepper", "in2_pin"),
        ("stepper", "in3_pin"),
        ("stepper", "in4_pin"),
        ("tof", "sda_pin"),
        ("tof", "scl_pin"),
        ("console", "tx_pin"),
        ("console", "rx_pin"),
    ];

    let mut seen: Vec<(u8, String)> = Vec::new();
    for (section, key) in pin_keys {
        let Some(value) = get(config, section, key) else {
            continue;
        };
        let pin = value
            .as_str()
            .and_then(|s| s.strip_prefix("gpio"))
            .and_then(|n| n.parse::<u8>().ok())
            .filter(|n| *n <= 29);
        let Some(pin) = pin else {
            errors.push(format!("[{}] {} must be \"gpio0\"..\"gpio29\"", section, key));
            continue;
        };

        let name = format!("{}.{}", section, key);
        if let Some((_, other)) = seen.iter().find(|(p, _)| *p == pin) {
            errors.push(format!("gpio{} used by both {} and {}", pin, other, name));
        }
        seen.push((pin, name));
    }
}

/// Cross-field numeric checks
fn validate_ranges(config: &toml::Value, errors: &mut Vec<String>) {
    if let (Some(min), Some(max)) = (
        get_int(config, "servo", "min_angle"),
        get_int(config, "servo", "max_angle"),
    ) {
        if !(0..=180).contains(&min) || !(0..=180).contains(&max) || min >= max {
            errors.push("[servo] need 0 <= min_angle < max_angle <= 180".to_string());
        }
    }

    if let Some(spr) = get_int(config, "stepper", "steps_per_revolution") {
        if !(360..=1 << 20).contains(&spr) {
            errors.push("[stepper] steps_per_revolution must be 360..=1048576".to_string());
        }
    }

    if let Some(inc) = get_int(config, "stepper", "increment_deg") {
        let total = get_int(config, "stepper", "total_degrees").unwrap_or(360);
        if inc < 1 || inc > total {
            errors.push("[stepper] increment_deg must be 1..=total_degrees".to_string());
        }
    }

    if let (Some(min), Some(max)) = (
        get_int(config, "tof", "min_range_mm"),
        get_int(config, "tof", "max_range_mm"),
    ) {
        if min >= max {
            errors.push("[tof] min_range_mm must be below max_range_mm".to_string());
        }
    }

    if let Some(budget) = get_int(config, "tof", "timing_budget_ms") {
        let short = get(config, "tof", "distance_mode").and_then(|v| v.as_str()) == Some("short");
        let allowed: &[i64] = if short {
            &[15, 20, 33, 50, 100, 200, 500]
        } else {
            &[20, 33, 50, 100, 200, 500]
        };
        if !allowed.contains(&budget) {
            errors.push(format!(
                "[tof] timing_budget_ms must be one of {:?} in this distance mode",
                allowed
            ));
        }
    }

    if let Some(size) = get_int(config, "cloud", "batch_size") {
        if !(1..=16).contains(&size) {
            errors.push("[cloud] batch_size must be 1..=16".to_string());
        }
    }
}
