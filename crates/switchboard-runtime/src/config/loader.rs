//! Environment configuration loader using figment.
//!
//! # Configuration Priority (lowest to highest)
//!
//! 1. Built-in defaults
//! 2. `switchboard.toml` from the search paths (feature `toml-config`)
//! 3. Plain variables: `BOT_TOKEN`, `DEBUG`, `DATA_DIR`, `CONFIG_URL`,
//!    `USE_FUZZY`, `PREFIX`
//! 4. `SWITCHBOARD_*` variables, `__` separating nested keys
//!    (`SWITCHBOARD_LOGGING__LEVEL=debug` → `logging.level = "debug"`)
//! 5. Programmatic overrides via [`ConfigLoader::merge`]
//!
//! ```rust,ignore
//! use switchboard_runtime::config::ConfigLoader;
//!
//! let config = ConfigLoader::new().load()?;
//!
//! let config = ConfigLoader::new()
//!     .file("./deploy/switchboard.toml")
//!     .without_env()
//!     .load()?;
//! ```

use std::path::{Path, PathBuf};

use figment::Figment;
#[cfg(feature = "toml-config")]
use figment::providers::{Format, Toml};
use figment::providers::{Env, Serialized};
use tracing::{debug, info, trace};

use super::error::{ConfigError, ConfigResult};
use super::schema::SwitchboardConfig;

/// Variables read without a prefix.
const PLAIN_VARS: &[&str] = &[
    "BOT_TOKEN",
    "DEBUG",
    "DATA_DIR",
    "CONFIG_URL",
    "USE_FUZZY",
    "PREFIX",
];

/// Config file names searched for, in order.
#[cfg(feature = "toml-config")]
const FILE_NAMES: &[&str] = &["switchboard.toml"];

/// Layered loader for [`SwitchboardConfig`].
pub struct ConfigLoader {
    overrides: Figment,
    search_paths: Vec<PathBuf>,
    load_env: bool,
    config_file: Option<PathBuf>,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self {
            overrides: Figment::new(),
            search_paths: Vec::new(),
            load_env: true,
            config_file: None,
        }
    }

    /// Adds a search path for configuration files.
    ///
    /// When none are added, the current directory and the user config
    /// directory (`<config_dir>/switchboard`) are searched.
    pub fn search_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.search_paths.push(path.as_ref().to_path_buf());
        self
    }

    /// Sets a specific configuration file to load instead of searching.
    pub fn file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config_file = Some(path.as_ref().to_path_buf());
        self
    }

    /// Disables loading environment variables.
    pub fn without_env(mut self) -> Self {
        self.load_env = false;
        self
    }

    /// Merges configuration on top of every other source.
    pub fn merge(mut self, config: SwitchboardConfig) -> Self {
        self.overrides = self.overrides.merge(Serialized::defaults(config));
        self
    }

    /// Loads, extracts and validates the configuration.
    pub fn load(self) -> ConfigResult<SwitchboardConfig> {
        let config: SwitchboardConfig = self.build_figment()?.extract()?;

        if config.prefix.chars().count() != 1 {
            return Err(ConfigError::validation(format!(
                "prefix must be exactly one character, got '{}'",
                config.prefix
            )));
        }

        debug!(
            debug = config.debug,
            data_dir = %config.data_dir.display(),
            use_fuzzy = config.use_fuzzy,
            "Configuration loaded successfully"
        );

        Ok(config)
    }

    fn build_figment(self) -> ConfigResult<Figment> {
        let mut figment = Figment::from(Serialized::defaults(SwitchboardConfig::default()));

        if let Some(path) = &self.config_file {
            if !path.exists() {
                return Err(ConfigError::FileNotFound(path.clone()));
            }
            info!(path = %path.display(), "Loading configuration file");
            figment = Self::merge_config_file(figment, path)?;
        } else {
            figment = self.load_config_files(figment);
        }

        if self.load_env {
            trace!("Loading environment variables");
            figment = figment
                .merge(Env::raw().only(PLAIN_VARS))
                .merge(Env::prefixed("SWITCHBOARD_").split("__"));
        }

        Ok(figment.merge(self.overrides))
    }

    #[cfg_attr(not(feature = "toml-config"), allow(unused_variables))]
    fn merge_config_file(figment: Figment, path: &Path) -> ConfigResult<Figment> {
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        match ext {
            #[cfg(feature = "toml-config")]
            "toml" => Ok(figment.merge(Toml::file(path))),
            _ => Err(ConfigError::validation(format!(
                "unsupported or disabled configuration file format: .{ext}"
            ))),
        }
    }

    fn resolve_search_paths(&self) -> Vec<PathBuf> {
        if !self.search_paths.is_empty() {
            return self.search_paths.clone();
        }

        let mut paths = Vec::new();
        if let Ok(cwd) = std::env::current_dir() {
            paths.push(cwd);
        }
        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("switchboard"));
        }
        paths
    }

    #[cfg(feature = "toml-config")]
    fn load_config_files(&self, figment: Figment) -> Figment {
        for dir in self.resolve_search_paths() {
            for name in FILE_NAMES {
                let path = dir.join(name);
                if path.exists() {
                    info!(path = %path.display(), "Loading configuration file");
                    return figment.merge(Toml::file(path));
                }
            }
        }
        debug!("No configuration file found, using defaults and environment");
        figment
    }

    #[cfg(not(feature = "toml-config"))]
    fn load_config_files(&self, figment: Figment) -> Figment {
        trace!(
            paths = self.resolve_search_paths().len(),
            "File configuration disabled, skipping search"
        );
        figment
    }
}

/// Loads the configuration from the default locations.
pub fn load_config() -> ConfigResult<SwitchboardConfig> {
    ConfigLoader::new().load()
}
