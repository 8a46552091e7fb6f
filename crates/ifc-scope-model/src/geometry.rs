// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Bounding volumes and camera placement values

use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box
///
/// An empty box has `min = +inf` and `max = -inf`, so expanding it by any
/// point yields a degenerate box around that point.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Point3<f64>,
    pub max: Point3<f64>,
}

impl Aabb {
    /// Create a box from two corners (components are reordered as needed)
    pub fn new(a: Point3<f64>, b: Point3<f64>) -> Self {
        Self {
            min: a.inf(&b),
            max: a.sup(&b),
        }
    }

    /// Create a box from raw `[x, y, z]` corners
    pub fn from_arrays(min: [f64; 3], max: [f64; 3]) -> Self {
        Self::new(Point3::from(min), Point3::from(max))
    }

    /// An empty box that contains nothing
    pub fn empty() -> Self {
        Self {
            min: Point3::new(f64::INFINITY, f64::INFINITY, f64::INFINITY),
            max: Point3::new(f64::NEG_INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY),
        }
    }

    /// Check if the box contains no point
    pub fn is_empty(&self) -> bool {
        self.max.x < self.min.x || self.max.y < self.min.y || self.max.z < self.min.z
    }

    /// Grow the box to include a point
    pub fn expand_by_point(&mut self, point: &Point3<f64>) {
        self.min = self.min.inf(point);
        self.max = self.max.sup(point);
    }

    /// Grow the box to include another box (empty boxes are ignored)
    pub fn expand_by_box(&mut self, other: &Aabb) {
        if other.is_empty() {
            return;
        }
        self.min = self.min.inf(&other.min);
        self.max = self.max.sup(&other.max);
    }

    /// Union of two boxes
    pub fn union(&self, other: &Aabb) -> Aabb {
        let mut result = *self;
        result.expand_by_box(other);
        result
    }

    pub fn center(&self) -> Point3<f64> {
        nalgebra::center(&self.min, &self.max)
    }

    /// Size along each axis (zero for an empty box)
    pub fn size(&self) -> Vector3<f64> {
        if self.is_empty() {
            return Vector3::zeros();
        }
        self.max - self.min
    }

    /// Largest extent along any axis
    pub fn max_extent(&self) -> f64 {
        self.size().max()
    }
}

impl Default for Aabb {
    fn default() -> Self {
        Self::empty()
    }
}

impl FromIterator<Point3<f64>> for Aabb {
    fn from_iter<T: IntoIterator<Item = Point3<f64>>>(iter: T) -> Self {
        let mut aabb = Aabb::empty();
        for point in iter {
            aabb.expand_by_point(&point);
        }
        aabb
    }
}

/// Camera placement: eye position looking at a target point
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CameraPose {
    pub position: Point3<f64>,
    pub target: Point3<f64>,
}

impl CameraPose {
    pub fn new(position: Point3<f64>, target: Point3<f64>) -> Self {
        Self { position, target }
    }

    /// Vector from target to eye
    pub fn offset(&self) -> Vector3<f64> {
        self.position - self.target
    }

    pub fn distance(&self) -> f64 {
        self.offset().norm()
    }

    /// Convert to orbit parameters `(target, distance, azimuth, elevation)`
    ///
    /// Uses the same spherical convention as the orbit camera controller:
    /// `x = d·cos(el)·sin(az)`, `y = d·sin(el)`, `z = d·cos(el)·cos(az)`.
    pub fn to_orbit(&self) -> (Point3<f64>, f64, f64, f64) {
        let offset = self.offset();
        let distance = offset.norm();
        if distance == 0.0 {
            return (self.target, 0.0, 0.0, 0.0);
        }
        let elevation = (offset.y / distance).clamp(-1.0, 1.0).asin();
        let azimuth = offset.x.atan2(offset.z);
        (self.target, distance, azimuth, elevation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_empty_box() {
        let aabb = Aabb::empty();
        assert!(aabb.is_empty());
        assert_eq!(aabb.size(), Vector3::zeros());
        assert_eq!(aabb.max_extent(), 0.0);
    }

    #[test]
    fn test_new_reorders_corners() {
        let aabb = Aabb::from_arrays([5.0, -5.0, 5.0], [-5.0, 5.0, -5.0]);
        assert_eq!(aabb.min, Point3::new(-5.0, -5.0, -5.0));
        assert_eq!(aabb.max, Point3::new(5.0, 5.0, 5.0));
        assert_eq!(aabb.center(), Point3::origin());
    }

    #[test]
    fn test_union_ignores_empty() {
        let a = Aabb::from_arrays([0.0, 0.0, 0.0], [1.0, 2.0, 3.0]);
        assert_eq!(a.union(&Aabb::empty()), a);
        assert_eq!(Aabb::empty().union(&a), a);

        let b = Aabb::from_arrays([-1.0, 0.0, 0.0], [0.0, 0.0, 10.0]);
        let u = a.union(&b);
        assert_eq!(u.min, Point3::new(-1.0, 0.0, 0.0));
        assert_eq!(u.max, Point3::new(1.0, 2.0, 10.0));
        assert_eq!(u.max_extent(), 10.0);
    }

    #[test]
    fn test_from_points() {
        let aabb: Aabb = [Point3::new(1.0, 1.0, 1.0), Point3::new(-1.0, 3.0, 0.0)]
            .into_iter()
            .collect();
        assert_eq!(aabb.size(), Vector3::new(2.0, 2.0, 1.0));
    }

    #[test]
    fn test_orbit_from_top_down_pose() {
        let pose = CameraPose::new(Point3::new(0.0, 30.0, 0.0), Point3::origin());
        let (target, distance, _azimuth, elevation) = pose.to_orbit();
        assert_eq!(target, Point3::origin());
        assert_relative_eq!(distance, 30.0);
        assert_relative_eq!(elevation, std::f64::consts::FRAC_PI_2);
    }

    #[test]
    fn test_orbit_from_side_pose() {
        let pose = CameraPose::new(Point3::new(10.0, 0.0, 0.0), Point3::origin());
        let (_, distance, azimuth, elevation) = pose.to_orbit();
        assert_relative_eq!(distance, 10.0);
        assert_relative_eq!(azimuth, std::f64::consts::FRAC_PI_2);
        assert_relative_eq!(elevation, 0.0);
    }
}
