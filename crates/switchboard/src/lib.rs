//! # Switchboard
//!
//! A command router for chat bots.
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────┐  InboundMessage  ┌──────────┐  spawn  ┌────────────────────┐
//! │ Platform      │─────────────────▶│  Router  │────────▶│ Command handler    │
//! │ client        │   (sequential)   │          │────────▶│ Middleware (each)  │
//! └───────────────┘                  └──────────┘         └────────────────────┘
//!         ▲                               │ inline replies: simple commands,
//!         └───────── Session ─────────────┘ not found, rate limited, denied
//! ```
//!
//! - **Core**: the [`Session`](core::Session) capability and message model
//! - **Framework**: the [`Router`](framework::Router), commands, rate limits,
//!   permissions and fuzzy suggestions
//! - **Runtime**: configuration, logging and the event loop
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use switchboard::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let runtime = BotRuntime::load()?;
//!     let bot_config = runtime.load_bot_config().await?;
//!     let router = runtime.build_router(&bot_config, [
//!         Arc::new(HelpCommand::new()) as BoxedCommand,
//!         Arc::new(PingCommand::default()),
//!     ])?;
//!
//!     let (tx, rx) = tokio::sync::mpsc::channel(64);
//!     let session = connect_platform(tx).await?;
//!     runtime.run(Arc::new(router), session, rx).await;
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - `toml-config` (default): read `switchboard.toml`
//! - `json-log`: JSON log output, the default outside debug mode

pub use switchboard_core as core;
pub use switchboard_framework as framework;
pub use switchboard_runtime as runtime;

/// Commonly used types for building a bot.
///
/// ```rust,ignore
/// use switchboard::prelude::*;
/// ```
pub mod prelude {
    // Runtime - main entry point
    pub use switchboard_runtime::{BotConfig, BotRuntime, MuxLogger, ShutdownHandle, SwitchboardConfig};

    // Routing
    pub use switchboard_framework::{
        BoxedCommand, Command, CommandPermissions, CommandSettings, DispatchContext,
        DispatchOutcome, ErrorTexts, HelpCommand, Options, RateLimitStore, Router, SimpleCommand,
    };

    // Platform capability
    pub use switchboard_core::{BoxedSession, InboundMessage, MessageKind, PlatformError, Session};
}
