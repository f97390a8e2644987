//! The four projection strategies.
//!
//! Every strategy consumes the evaluated samples and produces a world
//! point per sample, same order and count. When a strategy's structural
//! preconditions fail (no surface or index, missing endpoint hit,
//! coincident snap endpoints) it leaves the evaluated points untouched:
//! sketching degrades, it never hard-fails.

use log::trace;

use drape_core::Tolerance;
use drape_math::{Plane, Point3, Vector3};
use drape_mesh::TargetSurface;

use crate::classify::ProjectionMode;
use crate::cloud::ScreenSpaceIndex;
use crate::sample::{snap_to_surface, StrokeSample};

/// Project an evaluated stroke with the given mode.
pub fn project(
    mode: ProjectionMode,
    samples: &[StrokeSample],
    surface: Option<&dyn TargetSurface>,
    index: Option<&ScreenSpaceIndex>,
    tol: Tolerance,
) -> Vec<Point3> {
    let mut points: Vec<Point3> = samples.iter().map(|s| s.world).collect();
    if samples.len() < 2 {
        return points;
    }

    let index = index.filter(|i| !i.is_empty());
    match mode {
        ProjectionMode::Contour => project_contour(&mut points, samples, index, tol),
        ProjectionMode::Normal => project_normal(&mut points, samples, surface),
        ProjectionMode::Tangent => project_tangent(&mut points, samples, surface, index),
        ProjectionMode::Shell => project_shell(&mut points, samples, index, tol),
    }
    points
}

/// Snap both endpoints to the surface along their rays and project the
/// whole stroke onto one minimum-skew plane through them.
fn project_contour(
    points: &mut [Point3],
    samples: &[StrokeSample],
    index: Option<&ScreenSpaceIndex>,
    tol: Tolerance,
) {
    let Some(index) = index else {
        trace!("contour projection skipped: no screen-space index");
        return;
    };

    let n = samples.len();
    let s0 = snap_to_surface(&samples[0].ray, samples[0].screen, index).point;
    let sn = snap_to_surface(&samples[n - 1].ray, samples[n - 1].screen, index).point;

    let span = sn - s0;
    if tol.is_zero(span.length()) {
        trace!("contour projection skipped: snapped endpoints coincide");
        return;
    }

    let plane = Plane::minimum_skew(s0, samples[0].ray.direction, span.normalize());
    for (p, s) in points.iter_mut().zip(samples) {
        *p = plane.cast_ray(&s.ray);
    }
}

/// Project onto the minimum-skew plane spanned by the anchor ray and the
/// surface normal at the anchor hit.
///
/// Anchored at the first sample when it hit, mirrored to the last sample
/// when only that one hit.
fn project_normal(
    points: &mut [Point3],
    samples: &[StrokeSample],
    surface: Option<&dyn TargetSurface>,
) {
    let Some(surface) = surface else {
        trace!("normal projection skipped: no surface");
        return;
    };

    let n = samples.len();
    let anchor = if samples[0].hit {
        0
    } else if samples[n - 1].hit {
        n - 1
    } else {
        trace!("normal projection skipped: neither endpoint hit");
        return;
    };

    let Some((_, surface_normal)) = surface.closest_point_and_normal(points[anchor]) else {
        return;
    };
    let plane = Plane::minimum_skew(
        points[anchor],
        samples[anchor].ray.direction,
        surface_normal.normalize(),
    );

    for (p, s) in points.iter_mut().zip(samples) {
        *p = plane.cast_ray(&s.ray);
    }
}

/// Project onto one locally averaged tangent plane, levelled at the
/// middle sample's snap height.
fn project_tangent(
    points: &mut [Point3],
    samples: &[StrokeSample],
    surface: Option<&dyn TargetSurface>,
    index: Option<&ScreenSpaceIndex>,
) {
    let (Some(surface), Some(index)) = (surface, index) else {
        trace!("tangent projection skipped: no surface or index");
        return;
    };

    let n = samples.len();
    let mid = n / 2;
    let snap = snap_to_surface(&samples[mid].ray, samples[mid].screen, index);
    let middle = points[mid] - samples[mid].ray.direction * snap.height;

    let mut normal_sum = Vector3::ZERO;
    for p in points.iter() {
        if let Some((_, normal)) = surface.closest_point_and_normal(*p) {
            normal_sum += normal;
        }
    }
    let plane_normal = normal_sum / n as f64;
    if plane_normal.length_squared() < 1e-24 {
        trace!("tangent projection skipped: degenerate averaged normal");
        return;
    }

    let plane = Plane::new(middle, plane_normal);
    for (p, s) in points.iter_mut().zip(samples) {
        *p = plane.cast_ray(&s.ray);
    }
}

/// Relief projection: snapped endpoint heights are interpolated across
/// interior hits, and every interior run of misses is bridged by its own
/// minimum-skew plane between the bounding known points.
fn project_shell(
    points: &mut [Point3],
    samples: &[StrokeSample],
    index: Option<&ScreenSpaceIndex>,
    tol: Tolerance,
) {
    let Some(index) = index else {
        trace!("shell projection skipped: no screen-space index");
        return;
    };

    let n = samples.len();
    let mut start_height = 0.0;
    let mut end_height = 0.0;

    if !samples[0].hit {
        let snap = snap_to_surface(&samples[0].ray, samples[0].screen, index);
        points[0] = snap.point;
        start_height = snap.height;
    }
    if !samples[n - 1].hit {
        let snap = snap_to_surface(&samples[n - 1].ray, samples[n - 1].screen, index);
        points[n - 1] = snap.point;
        end_height = snap.height;
    }

    let mut first_miss: Option<usize> = None;
    let mut last_miss = 0usize;
    for i in 1..n - 1 {
        if !samples[i].hit {
            if first_miss.is_none() {
                first_miss = Some(i);
            }
            last_miss = i;
        } else {
            let h = interpolate_height(
                samples[i].ray.origin,
                samples[0].ray.origin,
                samples[n - 1].ray.origin,
                start_height,
                end_height,
            );
            points[i] -= samples[i].ray.direction * h;

            if let Some(first) = first_miss.take() {
                bridge_run(points, samples, first, last_miss, tol);
            }
        }
    }
    if let Some(first) = first_miss {
        bridge_run(points, samples, first, last_miss, tol);
    }
}

/// Project one maximal run of missed samples onto a minimum-skew plane
/// between its two known neighbors.
fn bridge_run(
    points: &mut [Point3],
    samples: &[StrokeSample],
    first: usize,
    last: usize,
    tol: Tolerance,
) {
    let span = points[last + 1] - points[first - 1];
    if tol.is_zero(span.length()) {
        trace!("shell bridge skipped: degenerate run direction");
        return;
    }

    let plane = Plane::minimum_skew(
        points[first - 1],
        samples[first - 1].ray.direction,
        span.normalize(),
    );
    for j in first..=last {
        points[j] = plane.cast_ray(&samples[j].ray);
    }
}

/// Inverse-distance height interpolation between the stroke endpoints.
fn interpolate_height(
    p: Point3,
    start: Point3,
    end: Point3,
    start_height: f64,
    end_height: f64,
) -> f64 {
    let w1 = (p - start).length();
    let w2 = (p - end).length();
    if w1 + w2 == 0.0 {
        return start_height;
    }
    (w2 * start_height + w1 * end_height) / (w1 + w2)
}
