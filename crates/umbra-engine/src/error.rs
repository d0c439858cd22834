//! Engine error types.

use umbra_config::ConfigError;
use umbra_grid::GridError;

/// Errors returned while setting up the engine or loading a level.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// The configuration failed validation.
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    /// Generator output does not fit together.
    #[error("invalid level data: {0}")]
    Grid(#[from] GridError),
}
