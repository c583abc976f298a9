//! Errors reported while a scene or a render is being set up.
//!
//! Once rendering has started nothing fails any more: degenerate
//! samples contribute zero radiance and are discarded on the spot.

// others
use thiserror::Error;
// pbrt
use crate::core::pbrt::Float;

/// Invalid render settings, detected by `RenderConfig::validate`.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("image resolution {x}x{y} has no pixels")]
    ZeroResolution { x: i32, y: i32 },
    #[error("at least one sample per pixel is required")]
    ZeroSamples,
    #[error("tile size must be positive")]
    ZeroTileSize,
    #[error("max prims per BVH node must be in 1..=255, got {0}")]
    MaxPrimsInNode(usize),
    #[error("russian roulette threshold must be in [0, 1], got {0}")]
    RrThreshold(Float),
    #[error("no output file name given")]
    EmptyOutput,
}

/// Malformed scene content, detected before any ray is traced.
#[derive(Debug, Error)]
pub enum SceneError {
    #[error("invalid shape: {0}")]
    InvalidShape(String),
    #[error("singular transform: {0}")]
    SingularTransform(String),
    #[error("invalid light: {0}")]
    InvalidLight(String),
    #[error("invalid camera: {0}")]
    InvalidCamera(String),
    #[error("scene has neither primitives nor lights")]
    EmptyScene,
    #[error("a render thread panicked")]
    WorkerPanic,
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("could not write image: {0}")]
    Image(#[from] image::ImageError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
