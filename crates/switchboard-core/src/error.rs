//! Error types shared by every platform session implementation.

use thiserror::Error;

/// Errors a [`Session`](crate::Session) can report back to the router.
#[derive(Debug, Clone, Error)]
pub enum PlatformError {
    /// A text message could not be delivered.
    #[error("failed to send message to channel '{channel_id}': {reason}")]
    SendFailed {
        /// The destination channel.
        channel_id: String,
        /// Reason reported by the platform.
        reason: String,
    },

    /// Resolving a member of a group failed.
    #[error("failed to look up member '{user_id}' in group '{guild_id}': {reason}")]
    MemberLookup {
        /// The group that was queried.
        guild_id: String,
        /// The user that was queried.
        user_id: String,
        /// Reason reported by the platform.
        reason: String,
    },

    /// The requested object does not exist on the platform.
    #[error("'{0}' not found")]
    NotFound(String),

    /// The session does not implement this operation.
    #[error("operation '{0}' is not supported by this session")]
    Unsupported(&'static str),

    /// Any other platform failure.
    #[error("{0}")]
    Other(String),
}

impl PlatformError {
    /// Creates a send failure for `channel_id`.
    pub fn send_failed(channel_id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::SendFailed {
            channel_id: channel_id.into(),
            reason: reason.into(),
        }
    }

    /// Creates a member lookup failure.
    pub fn member_lookup(
        guild_id: impl Into<String>,
        user_id: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::MemberLookup {
            guild_id: guild_id.into(),
            user_id: user_id.into(),
            reason: reason.into(),
        }
    }

    /// Creates a free-form platform error.
    pub fn other(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }
}

/// Result type for session operations.
pub type PlatformResult<T> = Result<T, PlatformError>;
