//! The `help` command.
//!
//! `!help` lists every command the router knew about at
//! [`initialize`](crate::Router::initialize) time. `!help <name>` shows the
//! help of a single command.

use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;
use tracing::warn;

use crate::command::{BoxedCommand, Command, CommandSettings};
use crate::context::DispatchContext;
use crate::router::Router;

enum Entry {
    Full(BoxedCommand),
    Simple(String),
}

#[derive(Default)]
struct Catalogue {
    prefix: char,
    not_found: String,
    entries: BTreeMap<String, Entry>,
}

/// Reply to a bare `help` when nothing else is registered.
pub const NO_COMMANDS: &str = "No commands registered.";

/// Lists registered commands and shows per-command help.
pub struct HelpCommand {
    settings: CommandSettings,
    catalogue: RwLock<Catalogue>,
}

impl HelpCommand {
    pub fn new() -> Self {
        Self::with_settings(CommandSettings::new(
            "help",
            "Lists commands, or shows help for one command.",
        ))
    }

    /// Creates the command with custom settings, e.g. another name or a rate
    /// limit.
    pub fn with_settings(settings: CommandSettings) -> Self {
        Self {
            settings,
            catalogue: RwLock::new(Catalogue::default()),
        }
    }

    fn listing(&self) -> String {
        let catalogue = self.catalogue.read();
        if catalogue.entries.is_empty() {
            return NO_COMMANDS.to_string();
        }
        let mut out = String::new();
        for (name, entry) in &catalogue.entries {
            let help = match entry {
                Entry::Full(cmd) => cmd.settings().help_text.as_str(),
                Entry::Simple(help) => help.as_str(),
            };
            let _ = writeln!(out, "- `{}{}`: {}", catalogue.prefix, name, help);
        }
        out
    }
}

impl Default for HelpCommand {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Command for HelpCommand {
    fn init(&self, router: &Router) {
        let own_name = self.settings.name.to_lowercase();
        let mut entries = BTreeMap::new();

        for simple in router.simple_commands() {
            entries.insert(
                simple.name.to_lowercase(),
                Entry::Simple(simple.help_text.clone()),
            );
        }
        for (name, cmd) in router.commands() {
            if name != own_name {
                entries.insert(name.to_string(), Entry::Full(Arc::clone(cmd)));
            }
        }

        *self.catalogue.write() = Catalogue {
            prefix: router.prefix(),
            not_found: router.errors().not_found.clone(),
            entries,
        };
    }

    async fn handle(&self, ctx: Arc<DispatchContext>) {
        let Some(target) = ctx.arguments().first() else {
            let listing = self.listing();
            if let Err(e) = ctx.reply(listing).await {
                warn!(error = %e, "Failed to send command listing");
            }
            return;
        };

        let target = target.strip_prefix(ctx.prefix()).unwrap_or(target);
        let target = target.to_lowercase();

        // Resolve under the lock, send after releasing it.
        let resolved = {
            let catalogue = self.catalogue.read();
            match catalogue.entries.get(&target) {
                Some(Entry::Full(cmd)) => Ok(Arc::clone(cmd)),
                Some(Entry::Simple(help)) => Err(help.clone()),
                None => Err(catalogue.not_found.clone()),
            }
        };

        match resolved {
            Ok(cmd) => cmd.handle_help(ctx).await,
            Err(text) => {
                if let Err(e) = ctx.reply(text).await {
                    warn!(error = %e, "Failed to send help");
                }
            }
        }
    }

    fn settings(&self) -> &CommandSettings {
        &self.settings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::SimpleCommand;
    use crate::test_util::MockSession;
    use switchboard_core::InboundMessage;

    struct Ping {
        settings: CommandSettings,
    }

    #[async_trait]
    impl Command for Ping {
        async fn handle(&self, _ctx: Arc<DispatchContext>) {}

        fn settings(&self) -> &CommandSettings {
            &self.settings
        }
    }

    fn router() -> Router {
        let mut router = Router::new("!").unwrap();
        router.register([
            Arc::new(HelpCommand::new()) as BoxedCommand,
            Arc::new(Ping {
                settings: CommandSettings::new("ping", "Checks the bot is alive."),
            }),
        ]);
        router.register_simple([SimpleCommand::new("rules", "Be nice.", "Server rules.")]);
        router.initialize();
        router
    }

    async fn ask(router: &Router, content: &str) -> Vec<String> {
        let session = Arc::new(MockSession::new());
        router
            .handle(session.clone(), InboundMessage::new("u1", "g1", "c1", content))
            .await;
        router.wait_idle().await;
        session.replies()
    }

    #[tokio::test]
    async fn test_listing_is_sorted_and_excludes_itself() {
        let router = router();
        assert_eq!(
            ask(&router, "!help").await,
            vec!["- `!ping`: Checks the bot is alive.\n- `!rules`: Server rules.\n"]
        );
    }

    #[tokio::test]
    async fn test_listing_without_other_commands() {
        let mut router = Router::new("!").unwrap();
        router.register([Arc::new(HelpCommand::new()) as BoxedCommand]);
        router.initialize();

        assert_eq!(ask(&router, "!help").await, vec![NO_COMMANDS]);
    }

    #[tokio::test]
    async fn test_full_command_help() {
        let router = router();
        assert_eq!(
            ask(&router, "!help PING").await,
            vec!["Checks the bot is alive."]
        );
        assert_eq!(
            ask(&router, "!help !ping").await,
            vec!["Checks the bot is alive."]
        );
    }

    #[tokio::test]
    async fn test_simple_command_help() {
        let router = router();
        assert_eq!(ask(&router, "!help rules").await, vec!["Server rules."]);
    }

    #[tokio::test]
    async fn test_unknown_command_help() {
        let router = router();
        assert_eq!(ask(&router, "!help nope").await, vec!["Command not found."]);
    }
}
