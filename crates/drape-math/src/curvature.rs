//! Discrete curvature of 2D point sequences.
//!
//! Menger curvature of a point triple is `4 * area / (|xy| * |yz| * |zx|)`,
//! the reciprocal circumradius of the triangle through the three points.

use crate::Point2;

/// Menger curvature of three distinct 2D points.
///
/// Collinear points give 0. Inputs with coincident points divide by zero;
/// use `mean_stroke_curvature` for raw sample sequences.
pub fn menger_curvature(x: Point2, y: Point2, z: Point2) -> f64 {
    let xy = x - y;
    let zy = z - y;
    let zx = z - x;
    let area = 0.5 * xy.perp_dot(zy).abs();
    4.0 * area / (xy.length() * zy.length() * zx.length())
}

/// Mean Menger curvature over all consecutive triples of a polyline.
///
/// Triples with any coincident pair are skipped. Returns `None` when no
/// valid triple exists (fewer than 3 points, or all triples degenerate).
pub fn mean_stroke_curvature(points: &[Point2]) -> Option<f64> {
    if points.len() < 3 {
        return None;
    }

    let mut sum = 0.0;
    let mut valid = 0usize;
    for w in points.windows(3) {
        let (x, y, z) = (w[0], w[1], w[2]);
        let a = (x - y).length();
        let b = (z - y).length();
        let c = (z - x).length();
        if a == 0.0 || b == 0.0 || c == 0.0 {
            continue;
        }
        sum += menger_curvature(x, y, z);
        valid += 1;
    }

    if valid == 0 {
        None
    } else {
        Some(sum / valid as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use glam::dvec2;

    #[test]
    fn test_collinear_points_have_zero_curvature() {
        let k = menger_curvature(dvec2(0.0, 0.0), dvec2(1.0, 1.0), dvec2(3.0, 3.0));
        assert_relative_eq!(k, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_equilateral_curvature_is_inverse_circumradius() {
        // Side s: curvature = sqrt(3) / s, the reciprocal circumradius.
        let s = 2.0;
        let k = menger_curvature(
            dvec2(0.0, 0.0),
            dvec2(s, 0.0),
            dvec2(s / 2.0, s * 3f64.sqrt() / 2.0),
        );
        assert_relative_eq!(k, 3f64.sqrt() / s, epsilon = 1e-12);
    }

    #[test]
    fn test_equilateral_is_maximal_for_spacing() {
        // Fix |xy| = |yz| = 1 and vary the bend: the equilateral
        // configuration (|zx| = 1) curves harder than shallower ones.
        let equilateral = menger_curvature(
            dvec2(0.0, 0.0),
            dvec2(1.0, 0.0),
            dvec2(0.5, 3f64.sqrt() / 2.0),
        );
        for &height in &[0.1f64, 0.3, 0.6, 0.8] {
            let shallow = menger_curvature(dvec2(0.0, 0.0), dvec2(1.0, 0.0), dvec2(1.0 + (1.0 - height * height).sqrt(), height));
            assert!(shallow < equilateral);
        }
    }

    #[test]
    fn test_mean_skips_degenerate_triples() {
        let pts = [
            dvec2(0.0, 0.0),
            dvec2(0.0, 0.0), // coincident with the previous sample
            dvec2(1.0, 0.0),
            dvec2(2.0, 0.0),
            dvec2(3.0, 0.0),
        ];
        // Only the fully distinct, collinear triples survive.
        let mean = mean_stroke_curvature(&pts).unwrap();
        assert_relative_eq!(mean, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_mean_none_for_short_or_degenerate_input() {
        assert!(mean_stroke_curvature(&[dvec2(0.0, 0.0), dvec2(1.0, 0.0)]).is_none());
        let same = [dvec2(1.0, 1.0); 5];
        assert!(mean_stroke_curvature(&same).is_none());
    }

    #[test]
    fn test_mean_of_circle_samples_matches_radius() {
        let r = 10.0;
        let pts: Vec<Point2> = (0..16)
            .map(|i| {
                let a = i as f64 * std::f64::consts::TAU / 32.0;
                dvec2(r * a.cos(), r * a.sin())
            })
            .collect();
        let mean = mean_stroke_curvature(&pts).unwrap();
        assert_relative_eq!(mean, 1.0 / r, epsilon = 1e-3);
    }
}
