//! Axis-aligned bounding boxes

use glam::{Mat4, Vec3};

/// Tolerance used by containment checks so that objects resting exactly on
/// a room face (e.g. the floor) are not rejected by rounding noise.
pub const CONTAINMENT_EPSILON: f32 = 1e-4;

/// Axis-aligned bounding box in world or local space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min: Vec3,
    pub max: Vec3,
}

impl BoundingBox {
    pub const fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Minimal box enclosing the given points, or `None` for an empty set
    pub fn from_points<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = Vec3>,
    {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let (min, max) = iter.fold((first, first), |(min, max), p| (min.min(p), max.max(p)));
        Some(Self { min, max })
    }

    /// Transform all 8 corners and return the enclosing axis-aligned box
    pub fn transform(&self, matrix: &Mat4) -> Self {
        let corners = self.corners().map(|c| matrix.transform_point3(c));
        let mut min = corners[0];
        let mut max = corners[0];
        for corner in &corners[1..] {
            min = min.min(*corner);
            max = max.max(*corner);
        }
        Self { min, max }
    }

    pub fn corners(&self) -> [Vec3; 8] {
        let (a, b) = (self.min, self.max);
        [
            Vec3::new(a.x, a.y, a.z),
            Vec3::new(b.x, a.y, a.z),
            Vec3::new(a.x, b.y, a.z),
            Vec3::new(b.x, b.y, a.z),
            Vec3::new(a.x, a.y, b.z),
            Vec3::new(b.x, a.y, b.z),
            Vec3::new(a.x, b.y, b.z),
            Vec3::new(b.x, b.y, b.z),
        ]
    }

    /// The same box moved by `delta`
    pub fn translate(&self, delta: Vec3) -> Self {
        Self {
            min: self.min + delta,
            max: self.max + delta,
        }
    }

    pub fn union(&self, other: &Self) -> Self {
        Self {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Overlap test. Boxes that merely touch are considered intersecting.
    pub fn intersects(&self, other: &Self) -> bool {
        !(other.max.x < self.min.x
            || other.min.x > self.max.x
            || other.max.y < self.min.y
            || other.min.y > self.max.y
            || other.max.z < self.min.z
            || other.min.z > self.max.z)
    }

    /// True iff this box is fully contained in `outer` on all three axes
    pub fn is_within(&self, outer: &Self) -> bool {
        let lo = self.min.cmpge(outer.min - Vec3::splat(CONTAINMENT_EPSILON));
        let hi = self.max.cmple(outer.max + Vec3::splat(CONTAINMENT_EPSILON));
        lo.all() && hi.all()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn unit_at(center: Vec3) -> BoundingBox {
        BoundingBox::new(center - Vec3::splat(0.5), center + Vec3::splat(0.5))
    }

    #[test]
    fn test_from_points() {
        let b = BoundingBox::from_points([
            Vec3::new(1.0, -2.0, 0.0),
            Vec3::new(-1.0, 3.0, 0.5),
            Vec3::new(0.0, 0.0, -4.0),
        ])
        .unwrap();
        assert_eq!(b.min, Vec3::new(-1.0, -2.0, -4.0));
        assert_eq!(b.max, Vec3::new(1.0, 3.0, 0.5));
        assert!(BoundingBox::from_points(std::iter::empty()).is_none());
    }

    #[test]
    fn test_intersects_touching_and_disjoint() {
        let a = unit_at(Vec3::ZERO);
        assert!(a.intersects(&unit_at(Vec3::new(0.5, 0.0, 0.0))));
        assert!(a.intersects(&unit_at(Vec3::new(1.0, 0.0, 0.0))));
        assert!(!a.intersects(&unit_at(Vec3::new(1.01, 0.0, 0.0))));
        assert!(!a.intersects(&unit_at(Vec3::new(0.0, 0.0, -3.0))));
    }

    #[test]
    fn test_is_within_requires_full_containment() {
        let room = BoundingBox::new(Vec3::new(-5.0, 0.0, -5.0), Vec3::new(5.0, 10.0, 5.0));
        assert!(unit_at(Vec3::new(0.0, 0.5, 0.0)).is_within(&room));
        assert!(unit_at(Vec3::new(4.5, 9.5, -4.5)).is_within(&room));
        // Overlapping but poking out through the floor
        assert!(!unit_at(Vec3::new(0.0, 0.4, 0.0)).is_within(&room));
        assert!(!unit_at(Vec3::new(0.0, 5.0, 4.6)).is_within(&room));
    }

    #[test]
    fn test_transform_rotated_box_grows() {
        let b = unit_at(Vec3::ZERO);
        let rotated = b.transform(&Mat4::from_rotation_y(std::f32::consts::FRAC_PI_4));
        let half_diag = 0.5 * std::f32::consts::SQRT_2;
        assert_relative_eq!(rotated.max.x, half_diag, epsilon = 1e-5);
        assert_relative_eq!(rotated.min.z, -half_diag, epsilon = 1e-5);
        assert_relative_eq!(rotated.max.y, 0.5, epsilon = 1e-5);
    }
}
