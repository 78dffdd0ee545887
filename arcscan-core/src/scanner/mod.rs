//! Coordinated scanning
//!
//! In coordinated mode a single loop owns both actuators: for every
//! turntable increment the servo sweeps out and back, each valid distance
//! becomes a 3D point, and points are streamed in small batches.

pub mod batch;
pub mod point_cloud;
pub mod progress;
pub mod scan;
pub mod state;

pub use batch::PointBatcher;
pub use point_cloud::{spherical_to_cartesian, Bounds, Point3, PointCloud};
pub use progress::ScanProgress;
pub use scan::{Batch, Scan, StateChange, TurnEnd};
pub use state::{ScanEvent, ScanFault, ScanState};
