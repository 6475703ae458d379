//! Commands shipped with the example bot.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use switchboard::prelude::*;

/// Shows how a command replies, reports an error and is rate limited.
pub struct ExampleCommand {
    settings: CommandSettings,
    logger: MuxLogger,
}

impl ExampleCommand {
    /// Five uses per user per minute.
    pub fn new(logger: MuxLogger) -> Self {
        Self {
            settings: CommandSettings::new(
                "example",
                "Quick one-liner about what the command does",
            )
            .rate_limit(5, Arc::new(RateLimitStore::new(Duration::from_secs(60)))),
            logger,
        }
    }
}

#[async_trait]
impl Command for ExampleCommand {
    async fn handle(&self, ctx: Arc<DispatchContext>) {
        if let Err(e) = ctx
            .reply("Congratulations! You've run your first command")
            .await
        {
            tracing::warn!(error = %e, "Failed to reply");
        }

        self.logger
            .command_error(
                &ctx,
                anyhow::anyhow!("this is an example command error"),
                "Command errors print to the console and to chat.",
            )
            .await;
    }

    async fn handle_help(&self, ctx: Arc<DispatchContext>) {
        if let Err(e) = ctx
            .reply("Much bigger/more detailed command description")
            .await
        {
            tracing::warn!(error = %e, "Failed to send help");
        }
    }

    fn settings(&self) -> &CommandSettings {
        &self.settings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use switchboard::core::PlatformResult;

    /// A session whose sends always fail.
    #[derive(Default)]
    struct Offline {
        attempts: AtomicUsize,
    }

    #[async_trait]
    impl Session for Offline {
        fn self_id(&self) -> &str {
            "bot"
        }

        async fn send_text(&self, channel_id: &str, _content: &str) -> PlatformResult<String> {
            self.attempts.fetch_add(1, Ordering::SeqCst);
            Err(PlatformError::send_failed(channel_id, "offline"))
        }

        async fn member_roles(&self, _guild_id: &str, _user_id: &str) -> PlatformResult<Vec<String>> {
            Ok(Vec::new())
        }
    }

    fn ctx(session: Arc<Offline>) -> Arc<DispatchContext> {
        Arc::new(DispatchContext::new(
            '!',
            "example",
            Vec::new(),
            session,
            InboundMessage::new("u1", "g1", "c1", "!help example"),
        ))
    }

    #[tokio::test]
    async fn test_failed_sends_are_tolerated() {
        let session = Arc::new(Offline::default());
        let command = ExampleCommand::new(MuxLogger::default());

        command.handle_help(ctx(session.clone())).await;
        assert_eq!(session.attempts.load(Ordering::SeqCst), 1);

        // Greeting plus the error report.
        command.handle(ctx(session.clone())).await;
        assert_eq!(session.attempts.load(Ordering::SeqCst), 3);
    }
}
