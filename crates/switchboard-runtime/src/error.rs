//! Runtime error types.

use thiserror::Error;

use crate::config::ConfigError;
use switchboard_framework::RouterError;

/// Errors that can occur while starting a bot.
#[derive(Error, Debug)]
pub enum RuntimeError {
    /// Loading configuration failed.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The router could not be built.
    #[error("Failed to build router: {0}")]
    Router(#[from] RouterError),
}

/// Result type for runtime operations.
pub type RuntimeResult<T> = Result<T, RuntimeError>;
