//! Configuration loading and parsing
//!
//! The rig configuration is compiled into the image from `rig.toml` and
//! parsed at boot by a custom no_std parser.

pub mod toml;

pub use toml::parse_config;

use arcscan_core::config::RigConfig;
use defmt::*;

/// Embedded configuration (compiled into firmware)
/// Edit rig.toml and rebuild to customize
const EMBEDDED_CONFIG: &str = include_str!("../../rig.toml");

/// Load the embedded configuration, falling back to stock defaults
pub fn load_config() -> RigConfig {
    let config = match parse_config(EMBEDDED_CONFIG) {
        Ok(config) => {
            info!("Loaded embedded rig.toml");
            config
        }
        Err(e) => {
            error!("Failed to parse embedded config: {:?}", e);
            return RigConfig::default();
        }
    };

    match config.validate() {
        Ok(()) => config,
        Err(e) => {
            error!("Invalid rig config: {:?}, using defaults", e);
            RigConfig::default()
        }
    }
}
