//! The JSON bot configuration: simple commands and permissions.
//!
//! ```json
//! {
//!   "simpleCommands": { "rules": "Be nice." },
//!   "permissions": {
//!     "Ban": ["123", "456"],
//!     "kick": { "users": ["1"], "roles": [], "channels": ["9"] }
//!   }
//! }
//! ```
//!
//! `simpleCommands` is required. A permission entry is either a list of role
//! IDs or an object with any of `users`, `roles` and `channels`.

use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;

use reqwest::Url;
use serde::Deserialize;
use tracing::{debug, info};

use super::error::{ConfigError, ConfigResult};
use switchboard_framework::{CommandPermissions, SimpleCommand};

/// Help text given to simple commands loaded from the bot configuration.
pub const SIMPLE_COMMAND_HELP: &str = "This is a simple command";

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawBotConfig {
    simple_commands: BTreeMap<String, String>,
    #[serde(default)]
    permissions: HashMap<String, PermissionEntry>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum PermissionEntry {
    Roles(Vec<String>),
    Full(CommandPermissions),
}

impl From<PermissionEntry> for CommandPermissions {
    fn from(entry: PermissionEntry) -> Self {
        match entry {
            PermissionEntry::Roles(roles) => CommandPermissions::new().roles(roles),
            PermissionEntry::Full(perms) => perms,
        }
    }
}

/// Simple commands and permissions for one bot.
#[derive(Debug, Clone, PartialEq)]
pub struct BotConfig {
    source: String,
    simple_commands: BTreeMap<String, String>,
    permissions: HashMap<String, CommandPermissions>,
}

impl BotConfig {
    /// Loads the configuration from `source`, an http(s) URL or a file path.
    pub async fn load(source: impl Into<String>) -> ConfigResult<Self> {
        let source = source.into();
        let json = match remote_url(&source) {
            Some(url) => fetch(url).await?,
            None => read_file(&source).await?,
        };
        Self::from_json(source, &json)
    }

    /// Parses a configuration document. `source` is recorded for
    /// [`reload`](Self::reload).
    pub fn from_json(source: impl Into<String>, json: &str) -> ConfigResult<Self> {
        let source = source.into();
        let raw: RawBotConfig = serde_json::from_str(json).map_err(|e| ConfigError::Parse {
            origin: source.clone(),
            source: e,
        })?;

        let permissions = raw
            .permissions
            .into_iter()
            .map(|(name, entry)| (name.to_lowercase(), entry.into()))
            .collect();

        debug!(
            source = %source,
            simple_commands = raw.simple_commands.len(),
            "Bot configuration parsed"
        );

        Ok(Self {
            source,
            simple_commands: raw.simple_commands,
            permissions,
        })
    }

    /// Re-reads the same source, replacing the contents on success.
    pub async fn reload(&mut self) -> ConfigResult<()> {
        *self = Self::load(self.source.clone()).await?;
        info!(source = %self.source, "Bot configuration reloaded");
        Ok(())
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Simple command names and their reply content.
    pub fn simple_commands(&self) -> &BTreeMap<String, String> {
        &self.simple_commands
    }

    /// Permission entries keyed by lowercased command name.
    pub fn permissions(&self) -> &HashMap<String, CommandPermissions> {
        &self.permissions
    }

    /// Builds router-ready simple commands.
    pub fn to_simple_commands(&self) -> Vec<SimpleCommand> {
        self.simple_commands
            .iter()
            .map(|(name, content)| SimpleCommand::new(name, content, SIMPLE_COMMAND_HELP))
            .collect()
    }
}

/// Returns the URL if `source` is an absolute http(s) URL with a host.
fn remote_url(source: &str) -> Option<Url> {
    let url = Url::parse(source).ok()?;
    let remote = matches!(url.scheme(), "http" | "https") && url.host_str().is_some();
    remote.then_some(url)
}

async fn fetch(url: Url) -> ConfigResult<String> {
    info!(url = %url, "Fetching bot configuration");
    let fetch_err = |e| ConfigError::Fetch {
        url: url.to_string(),
        source: e,
    };

    reqwest::get(url.clone())
        .await
        .and_then(reqwest::Response::error_for_status)
        .map_err(fetch_err)?
        .text()
        .await
        .map_err(fetch_err)
}

async fn read_file(path: &str) -> ConfigResult<String> {
    let path = PathBuf::from(path);
    info!(path = %path.display(), "Reading bot configuration");
    match tokio::fs::read_to_string(&path).await {
        Ok(json) => Ok(json),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(ConfigError::FileNotFound(path)),
        Err(e) => Err(ConfigError::Read { path, source: e }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "simpleCommands": { "rules": "Be nice.", "site": "https://example.com" },
        "permissions": {
            "Ban": ["123", "456"],
            "kick": { "users": ["1"], "channels": ["9"] },
            "odd": []
        }
    }"#;

    #[test]
    fn test_parse_sample() {
        let config = BotConfig::from_json("inline", SAMPLE).unwrap();

        assert_eq!(config.source(), "inline");
        assert_eq!(config.simple_commands()["rules"], "Be nice.");
        assert_eq!(
            config.permissions()["ban"],
            CommandPermissions::new().roles(["123", "456"])
        );
        assert_eq!(
            config.permissions()["kick"],
            CommandPermissions::new().users(["1"]).channels(["9"])
        );
        assert!(config.permissions()["odd"].is_unrestricted());
        assert!(!config.permissions().contains_key("Ban"));
    }

    #[test]
    fn test_simple_commands_required() {
        let err = BotConfig::from_json("inline", r#"{ "permissions": {} }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_simple_command_values_must_be_strings() {
        let err = BotConfig::from_json("inline", r#"{ "simpleCommands": { "n": 1 } }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_to_simple_commands() {
        let config = BotConfig::from_json("inline", SAMPLE).unwrap();
        let commands = config.to_simple_commands();
        assert_eq!(commands.len(), 2);
        assert_eq!(commands[0].name, "rules");
        assert_eq!(commands[0].help_text, SIMPLE_COMMAND_HELP);
    }

    #[test]
    fn test_remote_url_detection() {
        assert!(remote_url("https://example.com/config.json").is_some());
        assert!(remote_url("http://localhost:8080/c.json").is_some());
        assert!(remote_url("data/config.json").is_none());
        assert!(remote_url("/etc/bot/config.json").is_none());
        assert!(remote_url("file:///etc/bot/config.json").is_none());
    }

    #[tokio::test]
    async fn test_load_and_reload_from_disk() {
        let path = std::env::temp_dir().join(format!("switchboard-bot-{}.json", std::process::id()));
        tokio::fs::write(&path, r#"{ "simpleCommands": { "a": "1" } }"#)
            .await
            .unwrap();

        let mut config = BotConfig::load(path.display().to_string()).await.unwrap();
        assert_eq!(config.simple_commands().len(), 1);

        tokio::fs::write(&path, SAMPLE).await.unwrap();
        config.reload().await.unwrap();
        assert_eq!(config.simple_commands().len(), 2);
        assert_eq!(config.permissions().len(), 3);

        tokio::fs::remove_file(&path).await.unwrap();
        assert!(matches!(
            config.reload().await.unwrap_err(),
            ConfigError::FileNotFound(_)
        ));
    }
}
