//! The engine instance: owned per-surface cache plus the one-call
//! press-drag-release pipeline.

use log::debug;

use drape_core::{DrapeError, Result, SurfaceId, Tolerance};
use drape_math::Point3;
use drape_mesh::TargetSurface;
use drape_view::Viewport;

use crate::classify::{classify, DrawMode, ProjectionMode};
use crate::cloud::ScreenSpaceIndex;
use crate::project::project;
use crate::sample::evaluate_stroke;
use crate::stroke::Stroke;

/// Tuning knobs with the engine's stock thresholds as defaults.
#[derive(Debug, Clone, Copy, serde::Serialize, serde::Deserialize)]
pub struct ProjectorOptions {
    /// Maximum ray parameter for surface intersections; hits beyond this
    /// count as misses.
    pub max_ray_param: f64,
    /// Upper bound on `1 - dot(drawn tangent, projected normal)` for the
    /// normal-alignment test.
    pub normal_threshold: f64,
    /// Upper bound on mean screen-space Menger curvature for the tangent
    /// test.
    pub curvature_threshold: f64,
    /// Number of leading samples (anchor included) forming the drawn
    /// tangent window.
    pub tangent_window: usize,
    /// Tolerance for degeneracy guards.
    pub tolerance: Tolerance,
}

impl Default for ProjectorOptions {
    fn default() -> Self {
        Self {
            max_ray_param: 10_000.0,
            normal_threshold: 0.15,
            curvature_threshold: 0.2,
            tangent_window: 3,
            tolerance: Tolerance::default_precision(),
        }
    }
}

/// Result of projecting one stroke.
#[derive(Debug, Clone)]
pub struct ProjectedStroke {
    pub mode: ProjectionMode,
    pub points: Vec<Point3>,
}

struct IndexCache {
    surface: SurfaceId,
    index: ScreenSpaceIndex,
}

/// Turns strokes into 3D point sequences against a selected target
/// surface.
///
/// The cached screen-space index is the only state that survives between
/// interactions; it is rebuilt whenever the selected surface changes and
/// must be rebuilt by the host when the view changes. Rebuilding takes
/// `&mut self` while projection takes `&self`, so a rebuild can never
/// race an in-flight query.
pub struct StrokeProjector {
    options: ProjectorOptions,
    cache: Option<IndexCache>,
}

impl StrokeProjector {
    pub fn new() -> Self {
        Self::with_options(ProjectorOptions::default())
    }

    pub fn with_options(options: ProjectorOptions) -> Self {
        Self {
            options,
            cache: None,
        }
    }

    pub fn options(&self) -> &ProjectorOptions {
        &self.options
    }

    /// Full rebuild of the screen-space index for a surface.
    pub fn rebuild(&mut self, surface: &dyn TargetSurface, viewport: &dyn Viewport) {
        let index = ScreenSpaceIndex::build(surface, viewport);
        self.cache = Some(IndexCache {
            surface: surface.id(),
            index,
        });
    }

    /// Rebuild only if the selected surface changed identity since the
    /// last build.
    pub fn refresh(&mut self, surface: &dyn TargetSurface, viewport: &dyn Viewport) {
        let stale = self
            .cache
            .as_ref()
            .map_or(true, |c| c.surface != surface.id());
        if stale {
            self.rebuild(surface, viewport);
        }
    }

    /// Drop the cached index (no surface selected).
    pub fn clear(&mut self) {
        self.cache = None;
    }

    /// The cached index, if it belongs to the given surface.
    fn index_for(&self, surface: Option<&dyn TargetSurface>) -> Option<&ScreenSpaceIndex> {
        let cache = self.cache.as_ref()?;
        let surface = surface?;
        (cache.surface == surface.id()).then_some(&cache.index)
    }

    /// Public view of the cache for hosts and tests.
    pub fn cached_index(&self) -> Option<&ScreenSpaceIndex> {
        self.cache.as_ref().map(|c| &c.index)
    }

    /// Process one finished stroke: evaluate rays, classify intent, and
    /// project every sample.
    ///
    /// `anchor` is the current selection point used for miss fallbacks.
    /// Single-point strokes produce no curve and are rejected here.
    pub fn project_stroke(
        &self,
        stroke: &Stroke,
        viewport: &dyn Viewport,
        surface: Option<&dyn TargetSurface>,
        anchor: Point3,
        draw_mode: DrawMode,
    ) -> Result<ProjectedStroke> {
        if stroke.len() < 2 {
            return Err(DrapeError::InsufficientSamples(stroke.len()));
        }

        let samples = evaluate_stroke(
            stroke,
            viewport,
            surface,
            anchor,
            self.options.max_ray_param,
        );

        let mode = classify(&samples, surface, viewport, &self.options, draw_mode);
        debug!(
            "classified stroke: {:?} ({} samples, {} hits)",
            mode,
            samples.len(),
            samples.iter().filter(|s| s.hit).count()
        );

        let points = project(
            mode,
            &samples,
            surface,
            self.index_for(surface),
            self.options.tolerance,
        );

        Ok(ProjectedStroke { mode, points })
    }
}

impl Default for StrokeProjector {
    fn default() -> Self {
        Self::new()
    }
}
