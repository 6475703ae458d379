//! Configuration for Switchboard bots.
//!
//! Two independent layers:
//!
//! - [`SwitchboardConfig`]: process settings (token, data directory, logging)
//!   layered from defaults, `switchboard.toml` and environment variables by
//!   the [`ConfigLoader`].
//! - [`BotConfig`]: the JSON document holding simple commands and
//!   permissions, read from disk or fetched over HTTP.

pub mod bot;
pub mod error;
pub mod loader;
pub mod schema;

pub use bot::{BotConfig, SIMPLE_COMMAND_HELP};
pub use error::{ConfigError, ConfigResult};
pub use loader::{ConfigLoader, load_config};
pub use schema::{LogFormat, LogLevel, LogOutput, LoggingConfig, SwitchboardConfig};
