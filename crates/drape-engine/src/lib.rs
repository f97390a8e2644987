//! Stroke classification & projection engine.
//!
//! Turns a free-hand 2D viewport stroke into a 3D curve that relates to a
//! target surface: per-sample rays are cast against the surface, the
//! stroke's intent is classified from hit-pattern, curvature, and
//! alignment cues, and every sample is re-projected onto a supporting
//! plane or interpolated height field.

pub mod classify;
pub mod cloud;
pub mod engine;
pub mod project;
pub mod sample;
pub mod stroke;

pub use classify::{classify, DrawMode, ProjectionMode};
pub use cloud::{NearestVertex, ScreenSpaceIndex};
pub use engine::{ProjectedStroke, ProjectorOptions, StrokeProjector};
pub use sample::{evaluate_stroke, snap_to_surface, Snap, StrokeSample};
pub use stroke::{ScreenPoint, Stroke};
