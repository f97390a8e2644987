pub mod camera;

pub use camera::Camera;

use drape_math::{Point2, Point3, Ray};

/// The two viewport capabilities the projection engine consumes: the
/// inverse projection from a screen coordinate to a world-space ray, and
/// the forward projection from a world point to a screen coordinate.
///
/// Screen space has its origin at the bottom-left of the viewport,
/// x to the right and y up, in pixels.
pub trait Viewport: Send + Sync {
    /// World-space ray through the given screen coordinate.
    fn screen_ray(&self, screen: Point2) -> Ray;

    /// Screen coordinate of a world point.
    fn world_to_screen(&self, world: Point3) -> Point2;
}
