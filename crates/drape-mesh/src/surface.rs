//! The surface interface consumed by the projection engine.

use drape_core::SurfaceId;
use drape_math::{Point2, Point3, Ray, Vector3};

use crate::TriangleMesh;

/// A ray/surface intersection.
#[derive(Debug, Clone, Copy)]
pub struct RayHit {
    pub point: Point3,
    pub t: f64,
    pub face: u32,
    pub barycentric: Point2,
}

/// Queries a sketching target surface must answer.
///
/// The engine treats implementations as read-only collaborators: it never
/// edits a surface, it only intersects rays with it, asks for closest
/// points, and indexes its vertices.
pub trait TargetSurface: Send + Sync {
    /// Identity used to invalidate per-surface caches.
    fn id(&self) -> SurfaceId;

    /// World-space vertex positions, indexed for screen-space snapping.
    fn points(&self) -> &[Point3];

    /// Nearest forward intersection within `max_param`, if any.
    fn intersect_ray(&self, ray: &Ray, max_param: f64) -> Option<RayHit>;

    /// Closest point on the surface and the surface normal there.
    fn closest_point_and_normal(&self, point: Point3) -> Option<(Point3, Vector3)>;
}

impl TargetSurface for TriangleMesh {
    fn id(&self) -> SurfaceId {
        self.id
    }

    fn points(&self) -> &[Point3] {
        &self.positions
    }

    fn intersect_ray(&self, ray: &Ray, max_param: f64) -> Option<RayHit> {
        TriangleMesh::intersect_ray(self, ray, max_param)
    }

    fn closest_point_and_normal(&self, point: Point3) -> Option<(Point3, Vector3)> {
        TriangleMesh::closest_point_and_normal(self, point)
    }
}
