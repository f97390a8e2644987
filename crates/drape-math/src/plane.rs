use crate::ray::Ray;
use crate::{Point3, Vector3};
use drape_core::Tolerance;
use serde::{Deserialize, Serialize};

/// A plane in 3D space defined by a point and normal.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Plane {
    pub origin: Point3,
    pub normal: Vector3,
}

impl Plane {
    pub fn new(origin: Point3, normal: Vector3) -> Self {
        Self {
            origin,
            normal: normal.normalize(),
        }
    }

    /// The plane through `point` that contains `in_plane` and deviates
    /// least from being perpendicular to `view_direction`.
    ///
    /// Normal is `d x (view x d)`. Both directions should be unit length;
    /// a view direction parallel to `in_plane` degenerates to a zero normal.
    pub fn minimum_skew(point: Point3, view_direction: Vector3, in_plane: Vector3) -> Self {
        let normal = in_plane.cross(view_direction.cross(in_plane));
        Self::new(point, normal)
    }

    /// Minimum-skew plane through `point` with the view direction derived
    /// from a camera position.
    pub fn minimum_skew_through(camera: Point3, point: Point3, in_plane: Vector3) -> Self {
        let view = (point - camera).normalize();
        Self::minimum_skew(point, view, in_plane)
    }

    /// Signed distance from a point to this plane.
    pub fn signed_distance(&self, point: Point3) -> f64 {
        (point - self.origin).dot(self.normal)
    }

    /// Project a point orthogonally onto this plane.
    pub fn project_point(&self, point: Point3) -> Point3 {
        point - self.normal * self.signed_distance(point)
    }

    /// Intersect a ray with this plane.
    ///
    /// Computed as `o + ((p - o).n / (d.n)) d`. When the ray is parallel
    /// to the plane the denominator vanishes and the result is infinite
    /// or NaN; callers guard where that matters (see `cast_ray_checked`).
    pub fn cast_ray(&self, ray: &Ray) -> Point3 {
        let t = (self.origin - ray.origin).dot(self.normal) / ray.direction.dot(self.normal);
        ray.origin + ray.direction * t
    }

    /// Like `cast_ray`, but returns `None` for a ray parallel to the plane.
    pub fn cast_ray_checked(&self, ray: &Ray, tol: Tolerance) -> Option<Point3> {
        let denom = ray.direction.dot(self.normal);
        if tol.is_zero(denom) {
            return None;
        }
        let t = (self.origin - ray.origin).dot(self.normal) / denom;
        Some(ray.origin + ray.direction * t)
    }
}
