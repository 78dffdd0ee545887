//! Range sensor drivers

pub mod vl53l1x;

pub use vl53l1x::{Vl53l1x, Vl53l1xError, DEFAULT_ADDRESS, MODEL_ID};
