use crate::{Point3, Vector3};
use serde::{Deserialize, Serialize};

/// A ray in 3D space defined by origin and direction.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Ray {
    pub origin: Point3,
    pub direction: Vector3,
}

impl Ray {
    pub fn new(origin: Point3, direction: Vector3) -> Self {
        Self {
            origin,
            direction: direction.normalize(),
        }
    }

    /// Get a point along the ray at parameter t.
    pub fn at(&self, t: f64) -> Point3 {
        self.origin + self.direction * t
    }

    /// Parameter of the orthogonal projection of a point onto the ray.
    ///
    /// Negative when the point lies behind the origin.
    pub fn param_of(&self, point: Point3) -> f64 {
        (point - self.origin).dot(self.direction)
    }

    /// Find the closest point on the ray to a given point.
    pub fn closest_point(&self, point: Point3) -> Point3 {
        let t = self.param_of(point).max(0.0);
        self.at(t)
    }

    /// Distance from a point to the ray.
    pub fn distance_to_point(&self, point: Point3) -> f64 {
        (point - self.closest_point(point)).length()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::dvec3;

    #[test]
    fn test_at() {
        let ray = Ray::new(dvec3(0.0, 0.0, 0.0), dvec3(1.0, 0.0, 0.0));
        let p = ray.at(5.0);
        assert!((p - dvec3(5.0, 0.0, 0.0)).length() < 1e-10);
    }

    #[test]
    fn test_param_of() {
        let ray = Ray::new(dvec3(1.0, 0.0, 0.0), dvec3(1.0, 0.0, 0.0));
        assert!((ray.param_of(dvec3(4.0, 2.0, 0.0)) - 3.0).abs() < 1e-10);
        assert!(ray.param_of(dvec3(-1.0, 0.0, 0.0)) < 0.0);
    }

    #[test]
    fn test_closest_point_behind_origin() {
        let ray = Ray::new(dvec3(0.0, 0.0, 0.0), dvec3(1.0, 0.0, 0.0));
        let p = ray.closest_point(dvec3(-5.0, 1.0, 0.0));
        assert!((p - ray.origin).length() < 1e-10);
    }

    #[test]
    fn test_distance_to_point() {
        let ray = Ray::new(dvec3(0.0, 0.0, 0.0), dvec3(1.0, 0.0, 0.0));
        let dist = ray.distance_to_point(dvec3(5.0, 3.0, 0.0));
        assert!((dist - 3.0).abs() < 1e-10);
    }
}
