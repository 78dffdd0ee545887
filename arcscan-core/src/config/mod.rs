//! Configuration types
//!
//! Board-agnostic rig configuration. The firmware fills these from an
//! embedded TOML file; every field defaults to the stock rig wiring and
//! timing.

pub mod types;

pub use types::*;
