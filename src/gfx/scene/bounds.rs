//! Axis-aligned bounding boxes
//!
//! Used to measure loaded models before they are normalized.

use cgmath::{Matrix4, Vector3, Vector4};

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// Minimum corner of the bounding box
    pub min: Vector3<f32>,
    /// Maximum corner of the bounding box
    pub max: Vector3<f32>,
}

impl Aabb {
    pub fn new(min: Vector3<f32>, max: Vector3<f32>) -> Self {
        Self { min, max }
    }

    /// Create an AABB from a set of points. Returns `None` for an empty set.
    pub fn from_points<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = [f32; 3]>,
    {
        let mut points = points.into_iter();
        let first = points.next()?;
        let first = Vector3::new(first[0], first[1], first[2]);
        let mut aabb = Self::new(first, first);
        for p in points {
            aabb.expand_to(Vector3::new(p[0], p[1], p[2]));
        }
        Some(aabb)
    }

    /// Grows the box so that it contains `point`.
    pub fn expand_to(&mut self, point: Vector3<f32>) {
        self.min.x = self.min.x.min(point.x);
        self.min.y = self.min.y.min(point.y);
        self.min.z = self.min.z.min(point.z);
        self.max.x = self.max.x.max(point.x);
        self.max.y = self.max.y.max(point.y);
        self.max.z = self.max.z.max(point.z);
    }

    /// Smallest box containing both `self` and `other`.
    pub fn union(&self, other: &Aabb) -> Aabb {
        let mut out = *self;
        out.expand_to(other.min);
        out.expand_to(other.max);
        out
    }

    pub fn center(&self) -> Vector3<f32> {
        (self.min + self.max) * 0.5
    }

    /// Half the size of the box along each axis.
    pub fn half_extent(&self) -> Vector3<f32> {
        (self.max - self.min) * 0.5
    }

    /// The eight corners of the box.
    pub fn corners(&self) -> [Vector3<f32>; 8] {
        let (a, b) = (self.min, self.max);
        [
            Vector3::new(a.x, a.y, a.z),
            Vector3::new(b.x, a.y, a.z),
            Vector3::new(a.x, b.y, a.z),
            Vector3::new(b.x, b.y, a.z),
            Vector3::new(a.x, a.y, b.z),
            Vector3::new(b.x, a.y, b.z),
            Vector3::new(a.x, b.y, b.z),
            Vector3::new(b.x, b.y, b.z),
        ]
    }

    /// Bounding box of this box after `matrix` is applied to it.
    pub fn transformed(&self, matrix: &Matrix4<f32>) -> Aabb {
        let corners = self.corners().map(|c| {
            let p = *matrix * Vector4::new(c.x, c.y, c.z, 1.0);
            Vector3::new(p.x, p.y, p.z)
        });
        let mut out = Aabb::new(corners[0], corners[0]);
        for c in &corners[1..] {
            out.expand_to(*c);
        }
        out
    }

    pub fn is_finite(&self) -> bool {
        [self.min, self.max]
            .iter()
            .all(|v| v.x.is_finite() && v.y.is_finite() && v.z.is_finite())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aabb_from_points() {
        let aabb = Aabb::from_points([[0.0, 0.0, 0.0], [1.0, 1.0, 1.0], [-1.0, -1.0, -1.0]])
            .expect("non-empty");

        assert_eq!(aabb.min, Vector3::new(-1.0, -1.0, -1.0));
        assert_eq!(aabb.max, Vector3::new(1.0, 1.0, 1.0));
        assert_eq!(aabb.half_extent(), Vector3::new(1.0, 1.0, 1.0));
    }

    #[test]
    fn test_aabb_empty() {
        assert!(Aabb::from_points(std::iter::empty()).is_none());
    }

    #[test]
    fn test_aabb_transformed_by_scale_and_translation() {
        let aabb = Aabb::new(Vector3::new(-1.0, -1.0, -1.0), Vector3::new(1.0, 1.0, 1.0));
        let m = Matrix4::from_translation(Vector3::new(0.0, 5.0, 0.0)) * Matrix4::from_scale(2.0);
        let out = aabb.transformed(&m);

        assert_eq!(out.min, Vector3::new(-2.0, 3.0, -2.0));
        assert_eq!(out.max, Vector3::new(2.0, 7.0, 2.0));
    }

    #[test]
    fn test_aabb_union() {
        let a = Aabb::new(Vector3::new(0.0, 0.0, 0.0), Vector3::new(1.0, 1.0, 1.0));
        let b = Aabb::new(Vector3::new(-2.0, 0.5, 0.0), Vector3::new(0.0, 3.0, 0.5));
        let u = a.union(&b);

        assert_eq!(u.min, Vector3::new(-2.0, 0.0, 0.0));
        assert_eq!(u.max, Vector3::new(1.0, 3.0, 1.0));
        assert_eq!(u.center(), Vector3::new(-0.5, 1.5, 0.5));
    }
}
