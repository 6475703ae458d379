//! Router options and user-facing error texts.

use serde::{Deserialize, Serialize};

/// Message filters applied before any parsing. All enabled by default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Options {
    /// Skip messages written by the bot itself.
    pub ignore_self: bool,
    /// Skip messages with no text content.
    pub ignore_empty: bool,
    /// Skip messages whose kind is not [`MessageKind::Default`](switchboard_core::MessageKind::Default).
    pub ignore_non_default: bool,
    /// Skip messages written by bot accounts.
    pub ignore_bots: bool,
    /// Skip direct messages.
    pub ignore_dms: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            ignore_self: true,
            ignore_empty: true,
            ignore_non_default: true,
            ignore_bots: true,
            ignore_dms: true,
        }
    }
}

/// Texts sent back when a command cannot be run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ErrorTexts {
    /// The command does not exist (also heads the fuzzy suggestion list).
    pub not_found: String,
    /// The caller failed the permission check.
    pub no_permission: String,
    /// The caller exceeded the command's rate limit.
    pub rate_limited: String,
    /// The caller's roles could not be resolved.
    pub lookup_failed: String,
}

impl Default for ErrorTexts {
    fn default() -> Self {
        Self {
            not_found: "Command not found.".into(),
            no_permission: "You do not have permission to use that command.".into(),
            rate_limited: "You've used this command too many times, wait a bit and try again."
                .into(),
            lookup_failed: "Something went wrong while checking your permissions.".into(),
        }
    }
}

impl ErrorTexts {
    /// Creates texts from the three per-outcome messages, keeping the default
    /// lookup failure text.
    pub fn new(
        not_found: impl Into<String>,
        no_permission: impl Into<String>,
        rate_limited: impl Into<String>,
    ) -> Self {
        Self {
            not_found: not_found.into(),
            no_permission: no_permission.into(),
            rate_limited: rate_limited.into(),
            ..Self::default()
        }
    }
}
