//! The as-drawn stroke: a densified polyline of screen pixels.

use drape_math::Point2;
use serde::{Deserialize, Serialize};

/// An integer pixel coordinate, x right and y up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScreenPoint {
    pub h: i32,
    pub v: i32,
}

impl ScreenPoint {
    pub fn new(h: i32, v: i32) -> Self {
        Self { h, v }
    }

    pub fn to_point2(self) -> Point2 {
        Point2::new(self.h as f64, self.v as f64)
    }
}

/// The pixel trace of one press-drag-release interaction.
///
/// Appending a pointer position rasterizes the segment from the previous
/// sample, one sample per scanline, so consecutive samples never skip a
/// row. A purely horizontal move adds no samples.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Stroke {
    points: Vec<ScreenPoint>,
    min: ScreenPoint,
    max: ScreenPoint,
}

impl Stroke {
    /// Start a stroke at the press position.
    pub fn begin(start: ScreenPoint) -> Self {
        Self {
            points: vec![start],
            min: start,
            max: start,
        }
    }

    /// Extend the stroke to a new pointer position, interpolating one
    /// sample per row in between.
    pub fn append(&mut self, p: ScreenPoint) {
        let last = self.points[self.points.len() - 1];
        let ydif = (p.v - last.v).abs();
        if ydif == 0 {
            return;
        }

        self.min.h = self.min.h.min(p.h);
        self.min.v = self.min.v.min(p.v);
        self.max.h = self.max.h.max(p.h);
        self.max.v = self.max.v.max(p.v);

        let yinc = if p.v < last.v { -1 } else { 1 };
        let xinc = (p.h - last.h) as f64 / ydif as f64;

        let mut fx = last.h as f64 + xinc;
        let mut cy = last.v + yinc;
        for _ in 0..ydif {
            self.points.push(ScreenPoint::new(fx as i32, cy));
            fx += xinc;
            cy += yinc;
        }
    }

    pub fn points(&self) -> &[ScreenPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Smallest screen rectangle containing the stroke, as (min, max).
    pub fn bounds(&self) -> (ScreenPoint, ScreenPoint) {
        (self.min, self.max)
    }
}
