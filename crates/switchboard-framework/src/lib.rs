//! # Switchboard Framework
//!
//! The command router at the heart of Switchboard.
//!
//! A [`Router`] receives every inbound message from the host client and
//! decides whether it is a command invocation. Routing runs in a fixed order:
//!
//! ```text
//! message ─▶ filters ─▶ tokenize ─▶ simple command? ──yes──▶ static reply
//!                                        │ no
//!                                        ▼
//!                                  full command? ──no──▶ fuzzy suggestions / not found
//!                                        │ yes
//!                                        ▼
//!                                  rate limit ─▶ middleware (spawned)
//!                                        │
//!                                        ▼
//!                                  permissions ─▶ handler (spawned)
//! ```
//!
//! The layer provides:
//! - [`Command`] trait and [`SimpleCommand`] static replies
//! - Per-command, per-user [`RateLimitStore`]
//! - Whitelist-style [`CommandPermissions`]
//! - Typo-tolerant [`FuzzyIndex`] suggestions
//! - Fire-and-forget [`Middleware`] observers
//! - A tower [`Service`](tower::Service) adapter ([`RouterService`])

pub mod builtin;
pub mod command;
pub mod context;
pub mod error;
pub mod fuzzy;
pub mod middleware;
pub mod options;
pub mod permission;
pub mod rate_limit;
pub mod router;
pub mod service;

#[cfg(test)]
mod test_util;

pub use builtin::HelpCommand;
pub use command::{BoxedCommand, Command, CommandSettings, SimpleCommand};
pub use context::DispatchContext;
pub use error::{RouterError, RouterResult};
pub use fuzzy::FuzzyIndex;
pub use middleware::{Middleware, into_middleware};
pub use options::{ErrorTexts, Options};
pub use permission::{CommandPermissions, check_permissions};
pub use rate_limit::{DEFAULT_WINDOW, RateLimitStore};
pub use router::{DispatchOutcome, Filter, Router};
pub use service::{InboundEvent, RouterService};
