pub mod error;
pub mod id;
pub mod tolerance;
pub mod traits;

pub use error::{DrapeError, Result};
pub use id::SurfaceId;
pub use tolerance::Tolerance;
