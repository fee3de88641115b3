//! Cutting planes and point classification

use crate::float_types::{Real, tolerance};
use nalgebra::{Point3, Vector3};

// Plane classification constants
pub const COPLANAR: i8 = 0;
pub const FRONT: i8 = 1;
pub const BACK: i8 = 2;
pub const SPANNING: i8 = 3;

/// A plane in Hessian normal form: every point `p` on it satisfies `normal · p = w`.
#[derive(Debug, Clone, PartialEq)]
pub struct Plane {
    /// Unit normal vector of the plane
    pub normal: Vector3<Real>,
    /// Distance from origin along normal
    pub w: Real,
}

impl Plane {
    /// Create a new plane from a normal vector and distance.
    /// The normal is normalized; `w` is rescaled so the plane stays in place.
    pub fn from_normal(normal: Vector3<Real>, w: Real) -> Self {
        let len = normal.norm();
        Plane {
            normal: normal / len,
            w: w / len,
        }
    }

    /// Create the plane through `co` facing along `no`.
    pub fn from_point_normal(co: Point3<Real>, no: Vector3<Real>) -> Self {
        let normal = no.normalize();
        Plane {
            w: normal.dot(&co.coords),
            normal,
        }
    }

    pub const fn normal(&self) -> Vector3<Real> {
        self.normal
    }

    pub const fn offset(&self) -> Real {
        self.w
    }

    /// Flip the plane (reverse normal and distance)
    pub fn flip(&mut self) {
        self.normal = -self.normal;
        self.w = -self.w;
    }

    /// Return a flipped copy of this plane
    pub fn flipped(&self) -> Self {
        Plane {
            normal: -self.normal,
            w: -self.w,
        }
    }

    /// Signed distance from `point` to the plane, positive on the side the normal points to.
    #[inline]
    pub fn signed_distance(&self, point: &Point3<Real>) -> Real {
        self.normal.dot(&point.coords) - self.w
    }

    /// Classify a point as [`FRONT`], [`BACK`] or [`COPLANAR`] within [`tolerance`].
    pub fn orient_point(&self, point: &Point3<Real>) -> i8 {
        Self::classify_distance(self.signed_distance(point))
    }

    /// Classify an already computed signed distance.
    #[inline]
    pub fn classify_distance(distance: Real) -> i8 {
        let eps = tolerance();
        if distance > eps {
            FRONT
        } else if distance < -eps {
            BACK
        } else {
            COPLANAR
        }
    }

    /// Parameter `t` in `[0, 1]` where the segment `a -> b` meets the plane,
    /// or `None` if the segment is parallel to it.
    pub fn intersect_segment(&self, a: &Point3<Real>, b: &Point3<Real>) -> Option<Real> {
        let denom = self.normal.dot(&(b - a));
        if denom.abs() <= Real::EPSILON {
            return None;
        }
        Some(((self.w - self.normal.dot(&a.coords)) / denom).clamp(0.0, 1.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_normal_rescales_offset() {
        let plane = Plane::from_normal(Vector3::new(0.0, 0.0, 2.0), 4.0);
        assert_eq!(plane.normal(), Vector3::z());
        assert_eq!(plane.offset(), 2.0);
    }

    #[test]
    fn point_normal_and_flip() {
        let plane = Plane::from_point_normal(Point3::new(3.0, 3.0, 1.0), Vector3::z());
        assert!((plane.offset() - 1.0).abs() < 1e-9);
        assert_eq!(plane.orient_point(&Point3::new(0.0, 0.0, 2.0)), FRONT);
        assert_eq!(plane.orient_point(&Point3::new(0.0, 0.0, 0.0)), BACK);
        assert_eq!(plane.orient_point(&Point3::new(9.0, -4.0, 1.0)), COPLANAR);

        let flipped = plane.flipped();
        assert_eq!(flipped.normal(), -Vector3::z());
        assert_eq!(flipped.orient_point(&Point3::new(0.0, 0.0, 2.0)), BACK);
    }

    #[test]
    fn segment_intersection_parameter() {
        let plane = Plane::from_point_normal(Point3::new(1.0, 0.0, 0.0), Vector3::x());
        let t = plane
            .intersect_segment(&Point3::new(0.0, 0.0, 0.0), &Point3::new(4.0, 2.0, 0.0))
            .unwrap();
        assert!((t - 0.25).abs() < 1e-9);

        let parallel =
            plane.intersect_segment(&Point3::new(0.0, 0.0, 0.0), &Point3::new(0.0, 5.0, 0.0));
        assert!(parallel.is_none());
    }
}
