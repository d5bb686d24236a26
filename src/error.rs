//! Error types
//!
//! Only construction and configuration can fail. Simulation steps clamp and
//! guard instead of returning errors.

use thiserror::Error;

/// Errors surfaced while building a simulation or loading its configuration.
#[derive(Debug, Error)]
pub enum SimError {
    #[error("terrain dimensions must be non-zero (got {width}x{height})")]
    InvalidDimensions { width: usize, height: usize },

    #[error("failed to allocate terrain grid of {cells} cells")]
    TerrainAllocation { cells: usize },

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("config parse error: {0}")]
    ConfigParse(#[from] serde_json::Error),

    #[error("config io error: {0}")]
    ConfigIo(#[from] std::io::Error),
}
