//! Error types for the Switchboard framework.

use thiserror::Error;

/// Errors raised while configuring a [`Router`](crate::Router).
///
/// Everything that can go wrong while *dispatching* is recovered locally and
/// reported through [`DispatchOutcome`](crate::DispatchOutcome) instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouterError {
    /// The command prefix is not exactly one character long.
    #[error("prefix '{prefix}' must be exactly one character")]
    InvalidPrefix {
        /// The rejected prefix.
        prefix: String,
    },
}

/// Result type for router configuration.
pub type RouterResult<T> = Result<T, RouterError>;
