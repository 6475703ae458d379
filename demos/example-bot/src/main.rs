//! Example Bot
//!
//! Drives a Switchboard router from the terminal: every line typed on stdin is
//! treated as a message in a group channel.
//!
//! # Usage
//!
//! ```bash
//! mkdir -p data && echo '{"simpleCommands": {"rules": "Be nice."}}' > data/config.json
//! cargo run --package example-bot -- --fuzzy
//! ```
//!
//! Then type `!help`, `!rules`, `!example` or `!exmple`.

mod commands;
mod console;

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use switchboard::prelude::*;
use switchboard::runtime::ConfigLoader;
use tokio::sync::mpsc;
use tracing::{error, info};

use crate::commands::ExampleCommand;
use crate::console::{ConsoleSession, read_stdin};

#[derive(Debug, Parser)]
#[command(version, about = "Console-driven Switchboard example bot")]
struct Args {
    /// Command prefix, overriding PREFIX.
    #[arg(long)]
    prefix: Option<String>,

    /// Suggest similar commands on typos.
    #[arg(long)]
    fuzzy: bool,

    /// Bot configuration path or URL, overriding CONFIG_URL.
    #[arg(long)]
    config: Option<String>,

    /// Role held by the console user. Repeatable.
    #[arg(long = "role")]
    roles: Vec<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = ConfigLoader::new()
        .load()
        .context("failed to load configuration")?;
    if let Some(prefix) = args.prefix {
        config.prefix = prefix;
    }
    if args.fuzzy {
        config.use_fuzzy = true;
    }
    if let Some(source) = args.config {
        config.config_url = Some(source);
    }

    let runtime = BotRuntime::from_config(&config);
    let bot_config = runtime.load_bot_config().await.with_context(|| {
        format!(
            "failed to load bot configuration from {}",
            config.bot_config_source()
        )
    })?;

    let router = runtime.build_router(
        &bot_config,
        [
            Arc::new(HelpCommand::new()) as BoxedCommand,
            Arc::new(ExampleCommand::new(runtime.logger())),
        ],
    )?;
    info!(
        prefix = %router.prefix(),
        commands = router.commands().count(),
        simple_commands = router.simple_commands().count(),
        "Bot started"
    );

    // The loop ends when stdin closes and the queued lines are handled.
    let (tx, rx) = mpsc::channel(64);
    tokio::spawn(async move {
        if let Err(e) = read_stdin(tx).await {
            error!(error = %e, "Failed to read console input");
        }
    });

    let session: BoxedSession = Arc::new(ConsoleSession::new(args.roles));
    runtime.run(Arc::new(router), session, rx).await;

    Ok(())
}
