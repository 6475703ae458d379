//! The outbound half of the platform collaborator.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::{PlatformError, PlatformResult};

/// A live connection to a chat platform, as seen by the router.
///
/// Implementations wrap a platform SDK client. The router only needs to
/// reply in the channel a command came from and to resolve a member's roles
/// for permission checks; the name lookups exist for logging and have
/// default implementations returning [`PlatformError::Unsupported`].
///
/// # Example Implementation
///
/// ```rust,ignore
/// struct DiscordSession { http: Arc<Http>, me: String }
///
/// #[async_trait]
/// impl Session for DiscordSession {
///     fn self_id(&self) -> &str { &self.me }
///
///     async fn send_text(&self, channel_id: &str, content: &str) -> PlatformResult<String> {
///         let msg = self.http.send_message(channel_id, content).await
///             .map_err(|e| PlatformError::send_failed(channel_id, e.to_string()))?;
///         Ok(msg.id.to_string())
///     }
///
///     async fn member_roles(&self, guild_id: &str, user_id: &str) -> PlatformResult<Vec<String>> {
///         // ...
///     }
/// }
/// ```
#[async_trait]
pub trait Session: Send + Sync + 'static {
    /// Returns the platform ID of the bot account this session is logged in as.
    fn self_id(&self) -> &str;

    /// Sends `content` to `channel_id`, returning the ID of the new message.
    async fn send_text(&self, channel_id: &str, content: &str) -> PlatformResult<String>;

    /// Returns the role IDs held by `user_id` in `guild_id`.
    async fn member_roles(&self, guild_id: &str, user_id: &str) -> PlatformResult<Vec<String>>;

    /// Returns the display name of a channel.
    async fn channel_name(&self, _channel_id: &str) -> PlatformResult<String> {
        Err(PlatformError::Unsupported("channel_name"))
    }

    /// Returns the display name of a group.
    async fn guild_name(&self, _guild_id: &str) -> PlatformResult<String> {
        Err(PlatformError::Unsupported("guild_name"))
    }
}

/// A shared session trait object.
pub type BoxedSession = Arc<dyn Session>;
