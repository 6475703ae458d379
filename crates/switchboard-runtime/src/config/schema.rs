//! Configuration schema definitions.

use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Process-level settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SwitchboardConfig {
    /// Token used to authenticate with the chat platform.
    pub bot_token: Option<String>,

    /// Verbose human-readable logging plus the message logging middleware.
    pub debug: bool,

    /// Directory holding `config.json` when no URL is given.
    pub data_dir: PathBuf,

    /// Location of the bot configuration, a URL or a path.
    pub config_url: Option<String>,

    /// Suggest similar commands when a lookup misses.
    pub use_fuzzy: bool,

    /// Single-character command prefix.
    pub prefix: String,

    /// Logging settings. `debug` overrides level and format.
    pub logging: LoggingConfig,
}

impl Default for SwitchboardConfig {
    fn default() -> Self {
        Self {
            bot_token: None,
            debug: false,
            data_dir: PathBuf::from("data/"),
            config_url: None,
            use_fuzzy: false,
            prefix: "!".to_string(),
            logging: LoggingConfig::default(),
        }
    }
}

impl SwitchboardConfig {
    /// Returns where the bot configuration should be read from.
    ///
    /// `config_url` wins when set and non-empty, otherwise
    /// `<data_dir>/config.json`.
    pub fn bot_config_source(&self) -> String {
        match self.config_url.as_deref().filter(|s| !s.is_empty()) {
            Some(url) => url.to_string(),
            None => self.data_dir.join("config.json").display().to_string(),
        }
    }

    /// Returns the logging settings with the `debug` switch applied.
    pub fn effective_logging(&self) -> LoggingConfig {
        let mut logging = self.logging.clone();
        if self.debug {
            logging.level = LogLevel::Debug;
            logging.format = LogFormat::Pretty;
        }
        logging
    }
}

/// Logging settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: LogLevel,
    pub format: LogFormat,
    pub output: LogOutput,
    /// Required when `output` is `file`.
    pub file_path: Option<PathBuf>,
    pub thread_ids: bool,
    /// Include source file and line number.
    pub file_location: bool,
    /// Per-target levels, e.g. `switchboard_framework = "trace"`.
    pub filters: HashMap<String, LogLevel>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            format: LogFormat::default(),
            output: LogOutput::Stdout,
            file_path: None,
            thread_ids: false,
            file_location: false,
            filters: HashMap::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }

    pub fn to_tracing_level(self) -> tracing::Level {
        match self {
            Self::Trace => tracing::Level::TRACE,
            Self::Debug => tracing::Level::DEBUG,
            Self::Info => tracing::Level::INFO,
            Self::Warn => tracing::Level::WARN,
            Self::Error => tracing::Level::ERROR,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Log line format.
///
/// Defaults to `json` when the `json-log` feature is enabled, `compact`
/// otherwise. Without the feature, `json` falls back to `compact`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Compact,
    Full,
    Pretty,
    Json,
}

impl Default for LogFormat {
    fn default() -> Self {
        if cfg!(feature = "json-log") {
            Self::Json
        } else {
            Self::Compact
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogOutput {
    #[default]
    Stdout,
    Stderr,
    File,
}
