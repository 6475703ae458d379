//! Switchboard Runtime - configuration, logging and the event loop.
//!
//! This crate provides:
//! - Layered process configuration ([`SwitchboardConfig`], [`ConfigLoader`])
//! - The JSON bot configuration holding simple commands and permissions
//!   ([`BotConfig`])
//! - Logging setup ([`LoggingBuilder`]) plus the message logging middleware
//!   and command error reporter ([`MuxLogger`])
//! - Router wiring and the sequential event loop ([`BotRuntime`], [`serve`])
//!
//! ```rust,ignore
//! use switchboard_runtime::BotRuntime;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let runtime = BotRuntime::load()?;
//!     let bot_config = runtime.load_bot_config().await?;
//!     let router = Arc::new(runtime.build_router(&bot_config, my_commands())?);
//!
//!     let (tx, rx) = tokio::sync::mpsc::channel(64);
//!     spawn_platform_client(tx);
//!     runtime.run(router, session, rx).await;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod logging;
pub mod logs;
pub mod runtime;

pub use config::{BotConfig, ConfigError, ConfigLoader, ConfigResult, SwitchboardConfig};
pub use error::{RuntimeError, RuntimeResult};
pub use logging::LoggingBuilder;
pub use logs::MuxLogger;
pub use runtime::{BotRuntime, ShutdownHandle, serve, wait_for_shutdown};

// Re-export tracing for use by other crates
pub use tracing;
pub use tracing_subscriber;

/// Commonly used logging macros.
pub mod prelude {
    pub use tracing::{Level, debug, error, info, instrument, span, trace, warn};
}
