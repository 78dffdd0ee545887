//! Point cloud ring buffer with spherical to Cartesian conversion
//!
//! Coordinate system:
//! - theta (servo angle): 0° points up (+Z), 180° points down (-Z)
//! - phi (turntable angle): 0° is +X, 90° is +Y
//! - radius is the measured distance in millimetres

use core::f32::consts::PI;

use heapless::Deque;
use micromath::F32Ext;

/// A single 3D point with the spherical reading it came from
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Point3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    /// Servo angle in degrees
    pub theta: f32,
    /// Turntable angle in degrees
    pub phi: f32,
    /// Measured distance in millimetres
    pub distance_mm: f32,
}

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Bounds {
    pub min: [f32; 3],
    pub max: [f32; 3],
}

impl Bounds {
    fn from_point(p: &Point3) -> Self {
        Self {
            min: [p.x, p.y, p.z],
            max: [p.x, p.y, p.z],
        }
    }

    fn include(&mut self, p: &Point3) {
        for (axis, v) in [p.x, p.y, p.z].into_iter().enumerate() {
            if v < self.min[axis] {
                self.min[axis] = v;
            }
            if v > self.max[axis] {
                self.max[axis] = v;
            }
        }
    }
}

/// Convert a spherical reading (degrees, degrees, mm) to Cartesian mm
pub fn spherical_to_cartesian(theta_deg: f32, phi_deg: f32, distance_mm: f32) -> [f32; 3] {
    let theta = theta_deg * PI / 180.0;
    let phi = phi_deg * PI / 180.0;

    let sin_theta = F32Ext::sin(theta);
    let x = distance_mm * sin_theta * F32Ext::cos(phi);
    let y = distance_mm * sin_theta * F32Ext::sin(phi);
    let z = distance_mm * F32Ext::cos(theta);

    [x, y, z]
}

/// Fixed-capacity point cloud
///
/// Keeps the most recent `N` points. The total count, bounds and centroid
/// cover every point accepted since the last [`PointCloud::clear`], including
/// ones already evicted from the ring.
pub struct PointCloud<const N: usize> {
    points: Deque<Point3, N>,
    total: u32,
    bounds: Option<Bounds>,
    sum: [f32; 3],
}

impl<const N: usize> PointCloud<N> {
    /// Create an empty cloud
    pub const fn new() -> Self {
        Self {
            points: Deque::new(),
            total: 0,
            bounds: None,
            sum: [0.0; 3],
        }
    }

    /// Add a reading in spherical coordinates
    ///
    /// Returns `None` for non-positive distances.
    pub fn add_spherical(
        &mut self,
        theta_deg: f32,
        phi_deg: f32,
        distance_mm: f32,
    ) -> Option<Point3> {
        if distance_mm <= 0.0 {
            return None;
        }

        let [x, y, z] = spherical_to_cartesian(theta_deg, phi_deg, distance_mm);
        let point = Point3 {
            x,
            y,
            z,
            theta: theta_deg,
            phi: phi_deg,
            distance_mm,
        };

        if self.points.is_full() {
            self.points.pop_front();
        }
        let _ = self.points.push_back(point);

        self.total = self.total.saturating_add(1);
        self.sum[0] += x;
        self.sum[1] += y;
        self.sum[2] += z;
        match self.bounds.as_mut() {
            Some(bounds) => bounds.include(&point),
            None => self.bounds = Some(Bounds::from_point(&point)),
        }

        Some(point)
    }

    /// Points currently held in the ring
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// True if the ring holds no points
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Points accepted since the last clear
    pub fn total(&self) -> u32 {
        self.total
    }

    /// Bounding box, zero-sized at the origin when empty
    pub fn bounds(&self) -> Bounds {
        self.bounds.unwrap_or_default()
    }

    /// Mean position of every accepted point, origin when empty
    pub fn centroid(&self) -> [f32; 3] {
        if self.total == 0 {
            return [0.0; 3];
        }
        let n = self.total as f32;
        [self.sum[0] / n, self.sum[1] / n, self.sum[2] / n]
    }

    /// Most recent point
    pub fn latest(&self) -> Option<&Point3> {
        self.points.back()
    }

    /// Iterate retained points, oldest first
    pub fn iter(&self) -> impl Iterator<Item = &Point3> {
        self.points.iter()
    }

    /// Drop all points and statistics
    pub fn clear(&mut self) {
        self.points.clear();
        self.total = 0;
        self.bounds = None;
        self.sum = [0.0; 3];
    }
}

impl<const N: usize> Default for PointCloud<N> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOL: f32 = 5.0;

    fn close(a: f32, b: f32) -> bool {
        F32Ext::abs(a - b) < TOL
    }

    #[test]
    fn test_straight_up_is_plus_z() {
        let [x, y, z] = spherical_to_cartesian(0.0, 0.0, 100.0);
        assert!(close(x, 0.0) && close(y, 0.0) && close(z, 100.0));
    }

    #[test]
    fn test_horizontal_axes() {
        let [x, y, z] = spherical_to_cartesian(90.0, 0.0, 100.0);
        assert!(close(x, 100.0) && close(y, 0.0) && close(z, 0.0));

        let [x, y, z] = spherical_to_cartesian(90.0, 90.0, 100.0);
        assert!(close(x, 0.0) && close(y, 100.0) && close(z, 0.0));
    }

    #[test]
    fn test_straight_down_is_minus_z() {
        let [_, _, z] = spherical_to_cartesian(180.0, 45.0, 250.0);
        assert!(close(z, -250.0));
    }

    #[test]
    fn test_rejects_non_positive_distance() {
        let mut cloud: PointCloud<4> = PointCloud::new();
        assert!(cloud.add_spherical(90.0, 0.0, 0.0).is_none());
        assert!(cloud.add_spherical(90.0, 0.0, -1.0).is_none());
        assert!(cloud.is_empty());
        assert_eq!(cloud.total(), 0);
    }

    #[test]
    fn test_ring_keeps_latest() {
        let mut cloud: PointCloud<3> = PointCloud::new();
        for d in 1..=5 {
            cloud.add_spherical(90.0, 0.0, d as f32 * 100.0);
        }
        assert_eq!(cloud.len(), 3);
        assert_eq!(cloud.total(), 5);
        let first = cloud.iter().next().map(|p| p.distance_mm);
        assert_eq!(first, Some(300.0));
        assert_eq!(cloud.latest().map(|p| p.distance_mm), Some(500.0));
    }

    #[test]
    fn test_bounds_and_centroid() {
        let mut cloud: PointCloud<8> = PointCloud::new();
        assert_eq!(cloud.bounds(), Bounds::default());
        assert_eq!(cloud.centroid(), [0.0; 3]);

        cloud.add_spherical(90.0, 0.0, 100.0); // (100, 0, 0)
        cloud.add_spherical(90.0, 180.0, 100.0); // (-100, 0, 0)
        cloud.add_spherical(0.0, 0.0, 50.0); // (0, 0, 50)

        let bounds = cloud.bounds();
        assert!(close(bounds.min[0], -100.0));
        assert!(close(bounds.max[0], 100.0));
        assert!(close(bounds.max[2], 50.0));

        let c = cloud.centroid();
        assert!(close(c[0], 0.0));
        assert!(close(c[2], 50.0 / 3.0));
    }

    #[test]
    fn test_clear() {
        let mut cloud: PointCloud<4> = PointCloud::new();
        cloud.add_spherical(45.0, 45.0, 300.0);
        cloud.clear();
        assert!(cloud.is_empty());
        assert_eq!(cloud.total(), 0);
        assert_eq!(cloud.bounds(), Bounds::default());
    }
}
