use thiserror::Error;

#[derive(Debug, Error)]
pub enum DrapeError {
    #[error("Geometry error: {0}")]
    Geometry(String),

    #[error("Invalid mesh: {0}")]
    InvalidMesh(String),

    #[error("Stroke has {0} samples, at least 2 are required")]
    InsufficientSamples(usize),

    #[error("No target surface selected")]
    NoSurface,
}

pub type Result<T> = std::result::Result<T, DrapeError>;
