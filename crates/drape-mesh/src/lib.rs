pub mod surface;
pub mod trimesh;

pub use surface::{RayHit, TargetSurface};
pub use trimesh::TriangleMesh;
