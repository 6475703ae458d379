//! The per-invocation dispatch context.

use std::fmt;

use switchboard_core::{BoxedSession, InboundMessage, PlatformResult, Session};

/// Everything a middleware or command handler knows about one invocation.
///
/// Created by the router after a full command has been resolved and shared
/// through an `Arc` between the middleware tasks and the handler task. It is
/// dropped once the last of them finishes.
pub struct DispatchContext {
    prefix: char,
    command: String,
    arguments: Vec<String>,
    session: BoxedSession,
    message: InboundMessage,
}

impl DispatchContext {
    /// Creates a new context.
    pub fn new(
        prefix: char,
        command: impl Into<String>,
        arguments: Vec<String>,
        session: BoxedSession,
        message: InboundMessage,
    ) -> Self {
        Self {
            prefix,
            command: command.into(),
            arguments,
            session,
            message,
        }
    }

    /// Returns the router's command prefix.
    pub fn prefix(&self) -> char {
        self.prefix
    }

    /// Returns the lowercased command name.
    pub fn command(&self) -> &str {
        &self.command
    }

    /// Returns the whitespace-separated tokens after the command name.
    pub fn arguments(&self) -> &[String] {
        &self.arguments
    }

    /// Returns the session the message arrived on.
    pub fn session(&self) -> &dyn Session {
        self.session.as_ref()
    }

    /// Returns a clone of the session `Arc`.
    pub fn session_arc(&self) -> BoxedSession {
        BoxedSession::clone(&self.session)
    }

    /// Returns the originating message.
    pub fn message(&self) -> &InboundMessage {
        &self.message
    }

    /// Returns the author of the originating message.
    pub fn author_id(&self) -> &str {
        &self.message.author_id
    }

    /// Returns the channel the command was invoked in.
    pub fn channel_id(&self) -> &str {
        &self.message.channel_id
    }

    /// Sends `content` to the channel the command was invoked in.
    pub async fn reply(&self, content: impl AsRef<str>) -> PlatformResult<String> {
        self.session
            .send_text(&self.message.channel_id, content.as_ref())
            .await
    }
}

impl fmt::Debug for DispatchContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DispatchContext")
            .field("prefix", &self.prefix)
            .field("command", &self.command)
            .field("arguments", &self.arguments)
            .field("message", &self.message)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::MockSession;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_reply_goes_to_origin_channel() {
        let session = Arc::new(MockSession::new());
        let ctx = DispatchContext::new(
            '!',
            "roll",
            vec!["2d6".into()],
            session.clone(),
            InboundMessage::new("u1", "g1", "dice", "!roll 2d6"),
        );

        ctx.reply("7").await.unwrap();

        assert_eq!(ctx.command(), "roll");
        assert_eq!(ctx.arguments(), ["2d6"]);
        assert_eq!(ctx.author_id(), "u1");
        assert_eq!(session.sent(), vec![("dice".to_string(), "7".to_string())]);
    }
}
