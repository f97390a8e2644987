//! Per-sample ray evaluation and nearest-vertex surface snapping.

use drape_math::{Plane, Point3, Ray};
use drape_mesh::TargetSurface;
use drape_view::Viewport;

use crate::cloud::ScreenSpaceIndex;
use crate::stroke::{ScreenPoint, Stroke};

/// One stroke sample after ray evaluation.
///
/// `hit == true` means `world` is a true surface intersection. On a miss
/// `world` is a fallback at the selection anchor's depth along the ray,
/// good enough for display continuity but not trustworthy surface data.
#[derive(Debug, Clone, Copy)]
pub struct StrokeSample {
    pub screen: ScreenPoint,
    pub ray: Ray,
    pub hit: bool,
    pub world: Point3,
}

/// Cast a ray for every stroke sample and intersect it with the target
/// surface, recording hit/miss and a world point for each.
///
/// Intersections farther than `max_param` along the ray count as misses.
pub fn evaluate_stroke(
    stroke: &Stroke,
    viewport: &dyn Viewport,
    surface: Option<&dyn TargetSurface>,
    anchor: Point3,
    max_param: f64,
) -> Vec<StrokeSample> {
    stroke
        .points()
        .iter()
        .map(|&screen| {
            let ray = viewport.screen_ray(screen.to_point2());

            if let Some(hit) = surface.and_then(|s| s.intersect_ray(&ray, max_param)) {
                return StrokeSample {
                    screen,
                    ray,
                    hit: true,
                    world: hit.point,
                };
            }

            // Fallback: the anchor's depth along this particular ray, via
            // the plane through the anchor perpendicular to the ray.
            let world = Plane::new(anchor, -ray.direction).cast_ray(&ray);
            StrokeSample {
                screen,
                ray,
                hit: false,
                world,
            }
        })
        .collect()
}

/// A point on a camera ray nearest to the surface, with the perpendicular
/// distance to the snapped vertex as a height signal.
#[derive(Debug, Clone, Copy)]
pub struct Snap {
    pub point: Point3,
    pub height: f64,
}

/// Find the point on `ray` nearest to the surface: query the screen-space
/// index for the vertex closest to the sample's pixel, then project that
/// vertex onto the ray.
///
/// A vertex behind the ray origin gives no usable snap; the origin itself
/// is returned with zero height.
pub fn snap_to_surface(ray: &Ray, screen: ScreenPoint, index: &ScreenSpaceIndex) -> Snap {
    let Some(nearest) = index.nearest(screen.to_point2()) else {
        return Snap {
            point: ray.origin,
            height: 0.0,
        };
    };

    let t = ray.param_of(nearest.world);
    if t < 0.0 {
        return Snap {
            point: ray.origin,
            height: 0.0,
        };
    }

    let point = ray.at(t);
    Snap {
        point,
        height: (point - nearest.world).length(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use drape_math::{dvec3, Vector3};
    use drape_mesh::TriangleMesh;
    use drape_view::Camera;

    fn grid() -> TriangleMesh {
        TriangleMesh::planar_grid(
            dvec3(-1.0, -1.0, 0.0),
            Vector3::X * 2.0,
            Vector3::Y * 2.0,
            4,
            4,
        )
    }

    fn center_stroke(cam: &Camera, from: Point3, to: Point3) -> Stroke {
        let a = cam.world_to_screen(from);
        let b = cam.world_to_screen(to);
        let mut stroke = Stroke::begin(ScreenPoint::new(a.x as i32, a.y as i32));
        stroke.append(ScreenPoint::new(b.x as i32, b.y as i32));
        stroke
    }

    #[test]
    fn test_samples_over_surface_hit() {
        let cam = Camera::default();
        let mesh = grid();
        let stroke = center_stroke(&cam, dvec3(0.2, -0.5, 0.0), dvec3(0.2, 0.5, 0.0));

        let samples = evaluate_stroke(&stroke, &cam, Some(&mesh), Point3::ZERO, 10_000.0);
        assert_eq!(samples.len(), stroke.len());
        assert!(samples.iter().all(|s| s.hit));
        for s in &samples {
            assert!(s.world.z.abs() < 1e-9);
        }
    }

    #[test]
    fn test_miss_fallback_sits_at_anchor_depth() {
        let cam = Camera::default();
        let anchor = dvec3(0.0, 0.0, 1.0);
        // No surface at all: every sample misses.
        let stroke = center_stroke(&cam, dvec3(-0.5, -0.5, 0.0), dvec3(0.5, 0.5, 0.0));
        let samples = evaluate_stroke(&stroke, &cam, None, anchor, 10_000.0);

        for s in &samples {
            assert!(!s.hit);
            // The fallback lies in the plane through the anchor
            // perpendicular to this sample's ray.
            assert!((s.world - anchor).dot(s.ray.direction).abs() < 1e-9);
        }
    }

    #[test]
    fn test_snap_projects_vertex_onto_ray() {
        let cam = Camera::default();
        let mesh = grid();
        let index = ScreenSpaceIndex::build(&mesh, &cam);

        // Aim exactly at a vertex: the snap lands on the ray at the
        // vertex's depth, with near-zero height.
        let vertex = mesh.positions[12];
        let screen = cam.world_to_screen(vertex);
        let sp = ScreenPoint::new(screen.x.round() as i32, screen.y.round() as i32);
        let ray = cam.screen_ray(sp.to_point2());

        let snap = snap_to_surface(&ray, sp, &index);
        assert!((snap.point - vertex).length() < 0.02);
        assert!(snap.height < 0.02);
    }

    #[test]
    fn test_snap_behind_origin_returns_origin() {
        let mesh = grid();
        let cam = Camera::default();
        let index = ScreenSpaceIndex::build(&mesh, &cam);

        // A ray pointing away from the surface: every vertex is behind it.
        let ray = Ray::new(dvec3(0.0, 0.0, 5.0), dvec3(0.0, 0.0, 1.0));
        let snap = snap_to_surface(&ray, ScreenPoint::new(400, 300), &index);
        assert!((snap.point - ray.origin).length() < 1e-12);
        assert_eq!(snap.height, 0.0);
    }
}
