//! Command definitions.
//!
//! Two kinds of command can be registered with a [`Router`]:
//!
//! - **Full commands** implement [`Command`]. They go through rate limiting,
//!   middleware and permission checks, and their handler runs on its own task.
//! - **Simple commands** ([`SimpleCommand`]) are static replies. They bypass
//!   every gate and are answered inline.
//!
//! # Example
//!
//! ```rust,ignore
//! struct Ping {
//!     settings: CommandSettings,
//! }
//!
//! #[async_trait]
//! impl Command for Ping {
//!     async fn handle(&self, ctx: Arc<DispatchContext>) {
//!         let _ = ctx.reply("Pong!").await;
//!     }
//!
//!     fn settings(&self) -> &CommandSettings {
//!         &self.settings
//!     }
//! }
//!
//! router.register([Arc::new(Ping {
//!     settings: CommandSettings::new("ping", "Checks the bot is alive")
//!         .rate_limit(5, Arc::new(RateLimitStore::per_minute())),
//! }) as BoxedCommand]);
//! ```

use std::sync::Arc;

use async_trait::async_trait;
use tracing::warn;

use crate::context::DispatchContext;
use crate::rate_limit::RateLimitStore;
use crate::router::Router;

/// A full command, one implementation per command variant.
#[async_trait]
pub trait Command: Send + Sync + 'static {
    /// One-time setup, called by [`Router::initialize`] after every command
    /// has been registered.
    fn init(&self, _router: &Router) {}

    /// Runs the command. Invoked on a spawned task; the router never
    /// observes how it ends, so failures must be reported by the command.
    async fn handle(&self, ctx: Arc<DispatchContext>);

    /// Replies with a longer description of the command.
    ///
    /// Not called by the router itself; the builtin
    /// [`HelpCommand`](crate::HelpCommand) uses it for `help <name>`.
    async fn handle_help(&self, ctx: Arc<DispatchContext>) {
        if let Err(e) = ctx.reply(&self.settings().help_text).await {
            warn!(command = %self.settings().name, error = %e, "Failed to send help text");
        }
    }

    /// Returns the settings the router needs to route and gate this command.
    fn settings(&self) -> &CommandSettings;
}

/// A shared command trait object.
pub type BoxedCommand = Arc<dyn Command>;

/// Routing and gating settings declared by a [`Command`].
#[derive(Debug, Clone, Default)]
pub struct CommandSettings {
    /// Name the command is invoked by.
    pub name: String,
    /// One-line description.
    pub help_text: String,
    /// Maximum uses per user per window; `0` disables rate limiting.
    pub rate_limit_max: u32,
    /// Counter store backing the rate limit.
    pub rate_limiter: Option<Arc<RateLimitStore>>,
}

impl CommandSettings {
    /// Creates settings without a rate limit.
    pub fn new(name: impl Into<String>, help_text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            help_text: help_text.into(),
            rate_limit_max: 0,
            rate_limiter: None,
        }
    }

    /// Limits each user to `max` uses per window of `store`.
    pub fn rate_limit(mut self, max: u32, store: Arc<RateLimitStore>) -> Self {
        self.rate_limit_max = max;
        self.rate_limiter = Some(store);
        self
    }

    /// Records a use by `user_id` and reports whether it is allowed.
    ///
    /// Always `true` when no limiter is configured.
    pub fn check_limit(&self, user_id: &str) -> bool {
        match &self.rate_limiter {
            Some(store) if self.rate_limit_max > 0 => store.check(user_id, self.rate_limit_max),
            _ => true,
        }
    }
}

/// A logic-less command that always replies with the same text.
///
/// Simple commands have no settings: no rate limit, no permissions, and
/// middleware is not invoked for them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimpleCommand {
    /// Name the command is invoked by.
    pub name: String,
    /// Text sent back verbatim.
    pub content: String,
    /// One-line description.
    pub help_text: String,
}

impl SimpleCommand {
    /// Creates a simple command.
    pub fn new(
        name: impl Into<String>,
        content: impl Into<String>,
        help_text: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
            help_text: help_text.into(),
        }
    }
}
