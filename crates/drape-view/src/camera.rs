use drape_math::{Aabb3, Point2, Point3, Ray, Vector3};
use serde::{Deserialize, Serialize};

use crate::Viewport;

/// A 3D perspective camera with a pixel-space viewport mapping.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Camera {
    pub eye: Point3,    // camera position
    pub target: Point3, // look-at target
    pub up: Vector3,    // up vector
    pub fov_y: f64,     // vertical FOV in radians
    pub near: f64,      // near clip plane
    pub far: f64,       // far clip plane
    pub width: f64,     // viewport width in pixels
    pub height: f64,    // viewport height in pixels
}

impl Camera {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        eye: Point3,
        target: Point3,
        up: Vector3,
        fov_y: f64,
        near: f64,
        far: f64,
        width: f64,
        height: f64,
    ) -> Self {
        Self {
            eye,
            target,
            up,
            fov_y,
            near,
            far,
            width,
            height,
        }
    }

    pub fn aspect(&self) -> f64 {
        self.width / self.height
    }

    /// Orthonormal camera basis: (right, up, forward).
    fn basis(&self) -> (Vector3, Vector3, Vector3) {
        let forward = (self.target - self.eye).normalize();
        let right = forward.cross(self.up).normalize();
        let up = right.cross(forward);
        (right, up, forward)
    }

    /// Adjust camera to see an entire bounding box, keeping the current
    /// view direction.
    pub fn fit_to_aabb(&mut self, aabb: &Aabb3) {
        let center = aabb.center();
        let size = aabb.extents();
        let max_dim = size.x.max(size.y).max(size.z);

        let distance = max_dim / (2.0 * (self.fov_y / 2.0).tan());

        let view_dir = (self.target - self.eye).normalize();
        self.target = center;
        self.eye = center - view_dir * distance * 1.5; // 1.5x for padding
    }
}

impl Default for Camera {
    /// Eye at (0, 0, 5), looking at origin, 45 degree FOV, 800x600 viewport.
    fn default() -> Self {
        Self {
            eye: Point3::new(0.0, 0.0, 5.0),
            target: Point3::ZERO,
            up: Vector3::Y,
            fov_y: std::f64::consts::FRAC_PI_4,
            near: 0.1,
            far: 100.0,
            width: 800.0,
            height: 600.0,
        }
    }
}

impl Viewport for Camera {
    /// Ray through a pixel, with its origin on the near plane.
    ///
    /// Origins differ per pixel (they are not all the eye point); the
    /// engine's height interpolation measures distances between them.
    fn screen_ray(&self, screen: Point2) -> Ray {
        let (right, up, forward) = self.basis();
        let tan_half_fov = (self.fov_y / 2.0).tan();

        let ndc_x = 2.0 * screen.x / self.width - 1.0;
        let ndc_y = 2.0 * screen.y / self.height - 1.0;

        let direction = (forward
            + right * (ndc_x * tan_half_fov * self.aspect())
            + up * (ndc_y * tan_half_fov))
            .normalize();

        // Push the origin out to where this ray crosses the near plane.
        let origin = self.eye + direction * (self.near / direction.dot(forward));
        Ray { origin, direction }
    }

    /// Forward projection. Points behind the eye are outside the mapping's
    /// domain and produce mirrored coordinates.
    fn world_to_screen(&self, world: Point3) -> Point2 {
        let (right, up, forward) = self.basis();
        let tan_half_fov = (self.fov_y / 2.0).tan();

        let v = world - self.eye;
        let depth = v.dot(forward);
        let ndc_x = v.dot(right) / (depth * tan_half_fov * self.aspect());
        let ndc_y = v.dot(up) / (depth * tan_half_fov);

        Point2::new(
            (ndc_x + 1.0) / 2.0 * self.width,
            (ndc_y + 1.0) / 2.0 * self.height,
        )
    }
}
