//! Axis-aligned box geometry for platforms, obstacles and pads
//!
//! A box is stored as its center plus full extents (width, height, depth),
//! matching how level data is authored.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// An axis-aligned box in world space
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    /// Box center
    pub center: Vec3,
    /// Full extents (width, height, depth)
    pub size: Vec3,
}

impl Aabb {
    pub fn new(center: Vec3, size: Vec3) -> Self {
        Self { center, size }
    }

    /// Half extents of the box
    #[inline]
    pub fn half_extents(&self) -> Vec3 {
        self.size * 0.5
    }

    /// Height of the top face
    #[inline]
    pub fn top(&self) -> f32 {
        self.center.y + self.size.y * 0.5
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.center.y - self.size.y * 0.5
    }

    /// The smaller of the two horizontal half extents
    #[inline]
    pub fn min_horizontal_half_extent(&self) -> f32 {
        let half = self.half_extents();
        half.x.min(half.z)
    }

    /// Whether a point lies within the box's horizontal footprint (inclusive)
    #[inline]
    pub fn contains_xz(&self, point: Vec3) -> bool {
        self.contains_xz_expanded(point, 0.0)
    }

    /// Whether a point lies within the horizontal footprint grown by `margin` on every side
    pub fn contains_xz_expanded(&self, point: Vec3, margin: f32) -> bool {
        let half = self.half_extents();
        point.x >= self.center.x - half.x - margin
            && point.x <= self.center.x + half.x + margin
            && point.z >= self.center.z - half.z - margin
            && point.z <= self.center.z + half.z + margin
    }

    /// Sphere overlap using the box bounds expanded by the radius on each axis
    pub fn overlaps_sphere(&self, center: Vec3, radius: f32) -> bool {
        let half = self.half_extents();
        let delta = (center - self.center).abs();
        delta.x <= half.x + radius && delta.y <= half.y + radius && delta.z <= half.z + radius
    }

    /// Distance a sphere must travel along `dir` to leave the expanded bounds.
    ///
    /// Returns 0.0 when the sphere is already outside, and `f32::INFINITY`
    /// for a zero direction.
    pub fn exit_distance(&self, center: Vec3, radius: f32, dir: Vec3) -> f32 {
        if !self.overlaps_sphere(center, radius) {
            return 0.0;
        }
        let reach = self.half_extents() + Vec3::splat(radius);
        let offset = center - self.center;

        let mut exit = f32::INFINITY;
        for axis in 0..3 {
            let d = dir[axis];
            if d.abs() <= f32::EPSILON {
                continue;
            }
            let t = if d > 0.0 {
                (reach[axis] - offset[axis]) / d
            } else {
                (reach[axis] + offset[axis]) / -d
            };
            exit = exit.min(t);
        }
        exit.max(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_box() -> Aabb {
        Aabb::new(Vec3::new(0.0, 0.0, 5.0), Vec3::new(15.0, 1.0, 15.0))
    }

    #[test]
    fn test_top_and_half_extents() {
        let b = unit_box();
        assert_eq!(b.top(), 0.5);
        assert_eq!(b.bottom(), -0.5);
        assert_eq!(b.half_extents(), Vec3::new(7.5, 0.5, 7.5));
        assert_eq!(b.min_horizontal_half_extent(), 7.5);
    }

    #[test]
    fn test_contains_xz_is_inclusive() {
        let b = unit_box();
        assert!(b.contains_xz(Vec3::new(7.5, 100.0, 12.5)));
        assert!(!b.contains_xz(Vec3::new(7.51, 0.0, 5.0)));
        assert!(b.contains_xz_expanded(Vec3::new(8.4, 0.0, 5.0), 1.0));
    }

    #[test]
    fn test_sphere_overlap_uses_expanded_bounds() {
        let b = Aabb::new(Vec3::ZERO, Vec3::ONE);
        assert!(b.overlaps_sphere(Vec3::new(1.1, 0.0, 0.0), 0.6));
        assert!(!b.overlaps_sphere(Vec3::new(1.2, 0.0, 0.0), 0.6));
    }

    #[test]
    fn test_exit_distance() {
        let b = Aabb::new(Vec3::ZERO, Vec3::ONE);
        // Reach on x is 0.5 + 0.6 = 1.1
        let t = b.exit_distance(Vec3::new(0.5, 0.0, 0.0), 0.6, Vec3::X);
        assert!((t - 0.6).abs() < 1e-6);
        assert_eq!(b.exit_distance(Vec3::new(3.0, 0.0, 0.0), 0.6, Vec3::X), 0.0);
    }
}
