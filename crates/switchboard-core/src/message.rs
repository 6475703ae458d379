//! Inbound message model.

use serde::{Deserialize, Serialize};

/// The platform's classification of a message.
///
/// Only [`MessageKind::Default`] carries user-authored text; everything else
/// (joins, pins, replies to system events, ...) is ignored by the router
/// unless the `ignore_non_default` option is turned off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageKind {
    /// A regular user message.
    #[default]
    Default,
    /// A reply to another message.
    Reply,
    /// A member joined the group.
    MemberJoin,
    /// A message was pinned.
    ChannelPinned,
    /// Any other platform-specific system message.
    System,
}

/// A message delivered to the router by the host client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InboundMessage {
    /// Platform ID of the message itself.
    pub id: String,
    /// ID of the author.
    pub author_id: String,
    /// Display name of the author, for logging.
    pub author_name: String,
    /// Whether the author is a bot account.
    pub author_bot: bool,
    /// ID of the group (guild) the message was posted in; `None` for direct messages.
    pub guild_id: Option<String>,
    /// ID of the channel the message was posted in.
    pub channel_id: String,
    /// Message classification.
    pub kind: MessageKind,
    /// Raw text content.
    pub content: String,
}

impl InboundMessage {
    /// Creates a default-kind group message from a human author.
    pub fn new(
        author_id: impl Into<String>,
        guild_id: impl Into<String>,
        channel_id: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        let author_id = author_id.into();
        Self {
            id: String::new(),
            author_name: author_id.clone(),
            author_id,
            author_bot: false,
            guild_id: Some(guild_id.into()),
            channel_id: channel_id.into(),
            kind: MessageKind::Default,
            content: content.into(),
        }
    }

    /// Turns this message into a direct message (no group).
    pub fn direct(mut self) -> Self {
        self.guild_id = None;
        self
    }

    /// Marks the author as a bot account.
    pub fn from_bot(mut self) -> Self {
        self.author_bot = true;
        self
    }

    /// Sets the message kind.
    pub fn kind(mut self, kind: MessageKind) -> Self {
        self.kind = kind;
        self
    }

    /// Sets the message ID.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// Sets the author's display name.
    pub fn author_name(mut self, name: impl Into<String>) -> Self {
        self.author_name = name.into();
        self
    }

    /// Returns `true` if the message was posted inside a group.
    pub fn in_guild(&self) -> bool {
        self.guild_id.as_deref().is_some_and(|g| !g.is_empty())
    }
}
