//! # Error Types
//!
//! Configuration problems are fatal at startup and surface as [`ConfigError`].
//! Storage problems surface as [`StorageError`] and are logged by the world,
//! which falls back to regenerating the affected chunk.
//!
//! Addressing misses (a block that does not exist or a chunk that is not active)
//! are never errors: they are represented by `BlockLocator::INVALID`.

use thiserror::Error;

/// Errors raised while validating or loading a [`crate::config::WorldConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Chunk width and depth must be powers of two so block indices can be bit-packed.
    #[error("chunk {axis} must be a non-zero power of two, got {value}")]
    NonPowerOfTwo { axis: &'static str, value: u32 },

    #[error("chunk height must be non-zero")]
    ZeroHeight,

    /// Every block index of a chunk must fit the packed index range.
    #[error("chunk of {width}x{depth}x{height} blocks exceeds the limit of {max} blocks")]
    ChunkTooLarge {
        width: u32,
        depth: u32,
        height: u32,
        max: u64,
    },

    /// The deactivation radius must exceed the activation radius to avoid thrashing.
    #[error("deactivation radius ({deactivation}) must be greater than activation radius ({activation})")]
    RadiiMisordered { activation: u32, deactivation: u32 },

    #[error("{name} radius {radius} exceeds the limit of {max} chunks")]
    RadiusTooLarge {
        name: &'static str,
        radius: u32,
        max: u32,
    },

    #[error("sea level {sea_level} is outside the chunk height {height}")]
    SeaLevelOutOfRange { sea_level: u32, height: u32 },

    #[error("noise octaves must be at least 1")]
    ZeroOctaves,

    #[error("raycast step fraction must be in (0, 1], got {0}")]
    InvalidStepFraction(f32),

    #[error("saved chunk capacity must be non-zero")]
    ZeroStoreCapacity,

    /// The texture atlas cannot hold every tile the block registry refers to.
    #[error("texture atlas holds {available} tiles but the registry needs {required}")]
    AtlasTooSmall { available: u32, required: u32 },

    #[error("failed to parse world configuration: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to read world configuration: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised while encoding or restoring persisted chunk contents.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("saved chunk has {found} blocks, layout expects {expected}")]
    BlockCountMismatch { expected: usize, found: usize },

    #[error("failed to encode or decode saved chunk: {0}")]
    Json(#[from] serde_json::Error),
}
