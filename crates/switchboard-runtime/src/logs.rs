//! Message logging middleware and command error reporting.

use std::fmt::Display;
use std::sync::Arc;

use switchboard_framework::{DispatchContext, Middleware, into_middleware};
use tracing::{error, info, warn};

/// Logging helpers shared by the router and commands.
#[derive(Debug, Clone, Copy, Default)]
pub struct MuxLogger {
    debug: bool,
}

impl MuxLogger {
    pub fn new(debug: bool) -> Self {
        Self { debug }
    }

    pub fn debug(&self) -> bool {
        self.debug
    }

    /// Returns a middleware that logs every routed message when debug is on.
    ///
    /// Guild and channel names are looked up through the session; lookup
    /// failures leave the field empty.
    pub fn middleware(&self) -> Middleware {
        let debug = self.debug;
        into_middleware(move |ctx: Arc<DispatchContext>| async move {
            if !debug {
                return;
            }

            let message = ctx.message();
            let session = ctx.session();
            let channel = session
                .channel_name(&message.channel_id)
                .await
                .unwrap_or_default();
            let guild = match message.guild_id.as_deref() {
                Some(guild_id) if !guild_id.is_empty() => {
                    session.guild_name(guild_id).await.unwrap_or_default()
                }
                _ => String::new(),
            };

            info!(
                r#type = "multiplexer",
                message_guild = %guild,
                message_channel = %channel,
                message_author = %message.author_name,
                message_content = %message.content,
                "Message received"
            );
        })
    }

    /// Reports a command failure to the invoking channel and the log.
    pub async fn command_error(&self, ctx: &DispatchContext, err: impl Display, msg: &str) {
        let reply = format!("{msg} Maybe report it to the bot maintainers?\nError:```{err}```");
        if let Err(e) = ctx.reply(reply).await {
            warn!(error = %e, "Failed to report command error");
        }
        error!(r#type = "command", command = ctx.command(), error = %err, "{msg}");
    }
}
