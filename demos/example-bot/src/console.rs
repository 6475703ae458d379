//! A session that talks to the terminal.
//!
//! Every stdin line becomes a group message from [`CONSOLE_USER`]; replies
//! are printed to stdout.

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use switchboard::prelude::*;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::debug;

pub const CONSOLE_USER: &str = "console-user";
pub const CONSOLE_GUILD: &str = "console";
pub const CONSOLE_CHANNEL: &str = "stdin";

pub struct ConsoleSession {
    roles: Vec<String>,
    sent: AtomicU64,
}

impl ConsoleSession {
    /// Creates a session where the console user holds `roles`.
    pub fn new(roles: Vec<String>) -> Self {
        Self {
            roles,
            sent: AtomicU64::new(0),
        }
    }
}

#[async_trait]
impl Session for ConsoleSession {
    fn self_id(&self) -> &str {
        "example-bot"
    }

    async fn send_text(&self, channel_id: &str, content: &str) -> Result<String, PlatformError> {
        let id = self.sent.fetch_add(1, Ordering::Relaxed) + 1;
        println!("[#{channel_id}] bot: {content}");
        Ok(format!("reply-{id}"))
    }

    async fn member_roles(&self, _guild_id: &str, user_id: &str) -> Result<Vec<String>, PlatformError> {
        if user_id == CONSOLE_USER {
            Ok(self.roles.clone())
        } else {
            Err(PlatformError::NotFound(format!("member {user_id}")))
        }
    }

    async fn channel_name(&self, _channel_id: &str) -> Result<String, PlatformError> {
        Ok(CONSOLE_CHANNEL.to_string())
    }

    async fn guild_name(&self, _guild_id: &str) -> Result<String, PlatformError> {
        Ok(CONSOLE_GUILD.to_string())
    }
}

/// Forwards stdin lines to `tx` until EOF or the receiver goes away.
pub async fn read_stdin(tx: mpsc::Sender<InboundMessage>) -> std::io::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut n = 0u64;

    while let Some(line) = lines.next_line().await? {
        n += 1;
        let message = InboundMessage::new(CONSOLE_USER, CONSOLE_GUILD, CONSOLE_CHANNEL, line)
            .with_id(n.to_string())
            .author_name("you");
        if tx.send(message).await.is_err() {
            break;
        }
    }

    debug!(lines = n, "Console input closed");
    Ok(())
}
