//! Stroke intent classification.

use drape_math::{mean_stroke_curvature, Point2};
use drape_mesh::TargetSurface;
use drape_view::Viewport;

use crate::engine::ProjectorOptions;
use crate::sample::StrokeSample;

/// How a stroke is projected into 3D.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum ProjectionMode {
    /// Silhouette curve across the surface; the stroke floats entirely
    /// off-surface.
    Contour,
    /// Arc standing up from the surface along its normal.
    Normal,
    /// Arc lying within a locally averaged tangent plane.
    Tangent,
    /// General relief projection blending hit heights and planar bridges.
    Shell,
}

/// Explicit user override from an input modifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
pub enum DrawMode {
    #[default]
    Default,
    ForceNormal,
    ForceTangent,
}

/// Decide the projection mode for an evaluated stroke.
///
/// First match wins: forced mode, then all-miss contour, then normal
/// alignment (needs an endpoint hit), then tangent curvature, then shell.
pub fn classify(
    samples: &[StrokeSample],
    surface: Option<&dyn TargetSurface>,
    viewport: &dyn Viewport,
    options: &ProjectorOptions,
    draw_mode: DrawMode,
) -> ProjectionMode {
    match draw_mode {
        DrawMode::ForceNormal => return ProjectionMode::Normal,
        DrawMode::ForceTangent => return ProjectionMode::Tangent,
        DrawMode::Default => {}
    }

    let hit_count = samples.iter().filter(|s| s.hit).count();
    if hit_count == 0 {
        return ProjectionMode::Contour;
    }

    let endpoint_hit =
        samples.first().is_some_and(|s| s.hit) || samples.last().is_some_and(|s| s.hit);
    if endpoint_hit {
        if let Some(surface) = surface {
            if is_normal(samples, surface, viewport, options) {
                return ProjectionMode::Normal;
            }
        }
    }

    if is_tangent(samples, options) {
        return ProjectionMode::Tangent;
    }

    ProjectionMode::Shell
}

/// Does the drawn direction track how the surface normal appears in
/// screen space?
///
/// Anchored at the first sample when it hit; mirrored to the last sample
/// when only that one hit.
pub fn is_normal(
    samples: &[StrokeSample],
    surface: &dyn TargetSurface,
    viewport: &dyn Viewport,
    options: &ProjectorOptions,
) -> bool {
    let n = samples.len();
    if n < 2 {
        return false;
    }

    if samples[0].hit {
        let window = 1..options.tangent_window.min(n);
        alignment_at(samples, 0, window, surface, viewport) < options.normal_threshold
    } else if samples[n - 1].hit {
        let window = (1..options.tangent_window.min(n)).map(move |i| n - 1 - i);
        alignment_at(samples, n - 1, window, surface, viewport) < options.normal_threshold
    } else {
        false
    }
}

/// `1 - dot(drawn tangent, screen projection of the surface normal)` at
/// the anchor sample. Large when the test cannot be evaluated.
fn alignment_at(
    samples: &[StrokeSample],
    anchor: usize,
    window: impl Iterator<Item = usize>,
    surface: &dyn TargetSurface,
    viewport: &dyn Viewport,
) -> f64 {
    let p0 = samples[anchor].screen.to_point2();
    let mut drawn = Point2::ZERO;
    for i in window {
        drawn += samples[i].screen.to_point2() - p0;
    }
    let drawn = drawn.normalize_or_zero();
    if drawn == Point2::ZERO {
        return f64::INFINITY;
    }

    let Some((closest, normal)) = surface.closest_point_and_normal(samples[anchor].world) else {
        return f64::INFINITY;
    };
    let offset = closest + normal.normalize_or_zero();

    let s0 = viewport.world_to_screen(closest);
    let s1 = viewport.world_to_screen(offset);
    let proj = (s1 - s0).normalize_or_zero();
    if proj == Point2::ZERO {
        return f64::INFINITY;
    }

    1.0 - drawn.dot(proj)
}

/// A nearly straight stroke in screen space suggests an edge lying flat
/// within a tangent plane.
pub fn is_tangent(samples: &[StrokeSample], options: &ProjectorOptions) -> bool {
    let screen: Vec<Point2> = samples.iter().map(|s| s.screen.to_point2()).collect();
    match mean_stroke_curvature(&screen) {
        Some(mean) => mean <= options.curvature_threshold,
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::ProjectorOptions;
    use crate::sample::evaluate_stroke;
    use crate::stroke::{ScreenPoint, Stroke};
    use drape_math::{dvec2, dvec3, Point3, Ray, Vector3};
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

    fn synthetic_sample(h: i32, v: i32, hit: bool) -> StrokeSample {
        StrokeSample {
            screen: ScreenPoint::new(h, v),
            ray: Ray::new(dvec3(0.0, 0.0, 5.0), dvec3(0.0, 0.0, -1.0)),
            hit,
            world: Point3::ZERO,
        }
    }

    #[test]
    fn test_all_miss_is_contour_regardless_of_shape() {
        let cam = Camera::default();
        let mesh = grid();
        let options = ProjectorOptions::default();

        // A curvy and a straight all-miss stroke both classify Contour.
        for pts in [
            vec![(0, 0), (4, 1), (0, 2), (4, 3), (0, 4)],
            vec![(0, 0), (0, 1), (0, 2), (0, 3), (0, 4)],
        ] {
            let samples: Vec<StrokeSample> = pts
                .into_iter()
                .map(|(h, v)| synthetic_sample(h, v, false))
                .collect();
            let mode = classify(&samples, Some(&mesh), &cam, &options, DrawMode::Default);
            assert_eq!(mode, ProjectionMode::Contour);
        }
    }

    #[test]
    fn test_forced_modes_win() {
        let cam = Camera::default();
        let mesh = grid();
        let options = ProjectorOptions::default();
        let samples = vec![synthetic_sample(0, 0, false), synthetic_sample(0, 1, false)];

        let forced = classify(&samples, Some(&mesh), &cam, &options, DrawMode::ForceNormal);
        assert_eq!(forced, ProjectionMode::Normal);
        let forced = classify(&samples, Some(&mesh), &cam, &options, DrawMode::ForceTangent);
        assert_eq!(forced, ProjectionMode::Tangent);
    }

    #[test]
    fn test_straight_on_surface_stroke_is_tangent() {
        let cam = Camera::default();
        let mesh = grid();
        let options = ProjectorOptions::default();

        // Straight vertical stroke across the surface, drawn against the
        // screen-space direction of the surface normal.
        let a = cam.world_to_screen(dvec3(0.5, 0.5, 0.0));
        let b = cam.world_to_screen(dvec3(0.5, -0.5, 0.0));
        let mut stroke = Stroke::begin(ScreenPoint::new(a.x as i32, a.y as i32));
        stroke.append(ScreenPoint::new(b.x as i32, b.y as i32));

        let samples = evaluate_stroke(&stroke, &cam, Some(&mesh), Point3::ZERO, 10_000.0);
        assert!(samples.iter().all(|s| s.hit));
        let mode = classify(&samples, Some(&mesh), &cam, &options, DrawMode::Default);
        assert_eq!(mode, ProjectionMode::Tangent);
    }

    #[test]
    fn test_zigzag_on_surface_stroke_is_shell() {
        let cam = Camera::default();
        let mesh = grid();
        let options = ProjectorOptions::default();

        let start = cam.world_to_screen(dvec3(0.5, -0.5, 0.0));
        let (h0, v0) = (start.x as i32, start.y as i32);
        let mut stroke = Stroke::begin(ScreenPoint::new(h0, v0));
        for k in 1..=40 {
            let h = if k % 2 == 0 { h0 } else { h0 + 1 };
            stroke.append(ScreenPoint::new(h, v0 + k));
        }

        let samples = evaluate_stroke(&stroke, &cam, Some(&mesh), Point3::ZERO, 10_000.0);
        assert!(samples.iter().all(|s| s.hit));
        let mode = classify(&samples, Some(&mesh), &cam, &options, DrawMode::Default);
        assert_eq!(mode, ProjectionMode::Shell);
    }

    #[test]
    fn test_stroke_along_projected_normal_is_normal() {
        let cam = Camera::default();
        let mesh = grid();
        let options = ProjectorOptions::default();

        // Build the stroke along the screen projection of the surface
        // normal at a point the first sample hits.
        let base = dvec3(0.5, 0.5, 0.0);
        let s0 = cam.world_to_screen(base);
        let s1 = cam.world_to_screen(base + Vector3::Z);
        let dir = (s1 - s0).normalize();

        let mut stroke = Stroke::begin(ScreenPoint::new(s0.x.round() as i32, s0.y.round() as i32));
        let end = s0 + dir * 40.0;
        stroke.append(ScreenPoint::new(end.x.round() as i32, end.y.round() as i32));

        let samples = evaluate_stroke(&stroke, &cam, Some(&mesh), Point3::ZERO, 10_000.0);
        assert!(samples[0].hit);
        let mode = classify(&samples, Some(&mesh), &cam, &options, DrawMode::Default);
        assert_eq!(mode, ProjectionMode::Normal);
    }

    #[test]
    fn test_mirrored_normal_test_uses_last_sample() {
        let cam = Camera::default();
        let mesh = grid();
        let options = ProjectorOptions::default();

        // Walk in from off-surface toward a hit at the stroke's end,
        // against the projected-normal direction, so the window at the
        // last sample aligns with it.
        let base = dvec3(0.5, 0.5, 0.0);
        let s0 = cam.world_to_screen(base);
        let s1 = cam.world_to_screen(base + Vector3::Z);
        let dir = (s1 - s0).normalize();

        let far = s0 + dir * 220.0;
        let mut stroke = Stroke::begin(ScreenPoint::new(far.x.round() as i32, far.y.round() as i32));
        stroke.append(ScreenPoint::new(s0.x.round() as i32, s0.y.round() as i32));

        let samples = evaluate_stroke(&stroke, &cam, Some(&mesh), Point3::ZERO, 10_000.0);
        assert!(!samples[0].hit);
        assert!(samples[samples.len() - 1].hit);
        assert!(is_normal(&samples, &mesh, &cam, &options));
    }

    #[test]
    fn test_alignment_uses_screen_space_directions() {
        let cam = Camera::default();
        let mesh = grid();
        let options = ProjectorOptions::default();

        // Perpendicular to the projected normal: alignment fails.
        let base = dvec3(0.5, 0.5, 0.0);
        let s0 = cam.world_to_screen(base);
        let s1 = cam.world_to_screen(base + Vector3::Z);
        let n = (s1 - s0).normalize();
        let perp = dvec2(-n.y, n.x);

        let end = s0 + perp * 40.0;
        let mut stroke = Stroke::begin(ScreenPoint::new(s0.x.round() as i32, s0.y.round() as i32));
        stroke.append(ScreenPoint::new(end.x.round() as i32, end.y.round() as i32));

        let samples = evaluate_stroke(&stroke, &cam, Some(&mesh), Point3::ZERO, 10_000.0);
        assert!(samples[0].hit);
        assert!(!is_normal(&samples, &mesh, &cam, &options));
    }
}
