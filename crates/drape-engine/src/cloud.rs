//! Screen-space spatial index over a surface's vertices.

use kiddo::{KdTree, SquaredEuclidean};
use log::debug;
use rayon::prelude::*;

use drape_math::{Point2, Point3};
use drape_mesh::TargetSurface;
use drape_view::Viewport;

/// Result of a nearest-vertex query.
#[derive(Debug, Clone, Copy)]
pub struct NearestVertex {
    /// World-space position of the vertex.
    pub world: Point3,
    /// Its screen-space projection at build time.
    pub screen: Point2,
    /// Squared screen-space distance to the query point.
    pub dist_sq: f64,
}

/// Nearest-neighbor index over a surface's vertices projected into screen
/// space, with a parallel array back to world space.
///
/// Built once per surface selection and whenever the view changes; a
/// rebuild replaces the whole value, so tree and point arrays can never
/// disagree in size.
#[derive(Debug, Clone)]
pub struct ScreenSpaceIndex {
    tree: KdTree<f64, 2>,
    world: Vec<Point3>,
    screen: Vec<Point2>,
}

impl ScreenSpaceIndex {
    /// Project every surface vertex through the viewport and index the
    /// screen-space set.
    pub fn build(surface: &dyn TargetSurface, viewport: &dyn Viewport) -> Self {
        let world: Vec<Point3> = surface.points().to_vec();
        let screen: Vec<Point2> = world
            .par_iter()
            .map(|&p| viewport.world_to_screen(p))
            .collect();

        let entries: Vec<[f64; 2]> = screen.iter().map(|p| [p.x, p.y]).collect();
        let tree: KdTree<f64, 2> = (&entries).into();

        debug!(
            "screen-space index built: {} vertices for surface {}",
            world.len(),
            surface.id()
        );

        Self {
            tree,
            world,
            screen,
        }
    }

    pub fn len(&self) -> usize {
        self.world.len()
    }

    pub fn is_empty(&self) -> bool {
        self.world.is_empty()
    }

    /// The surface vertex closest, in screen space, to the given pixel.
    pub fn nearest(&self, screen: Point2) -> Option<NearestVertex> {
        if self.is_empty() {
            return None;
        }

        let result = self.tree.nearest_one::<SquaredEuclidean>(&[screen.x, screen.y]);
        let i = result.item as usize;

        Some(NearestVertex {
            world: self.world[i],
            screen: self.screen[i],
            dist_sq: result.distance,
        })
    }
}
