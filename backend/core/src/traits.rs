use async_trait::async_trait;

use crate::error::ScribeError;
use crate::message::ChatMessage;
use crate::types::{ChannelKind, Principal, Recipient, UserRef};

/// Handle onto the chat client SDK supplied by the embedding application.
///
/// Scribe never talks to the gateway itself; everything network-backed goes
/// through this trait so the core stays testable with in-memory fakes.
#[async_trait]
pub trait ChatClient: Send + Sync {
    /// Look up a channel by its snowflake id.
    async fn fetch_channel(&self, channel_id: &str) -> Result<Box<dyn Channel>, ScribeError>;

    /// Resolve a user reference (id or username) to a full identity.
    async fn resolve_user(&self, user: &UserRef) -> Result<Principal, ScribeError>;
}

/// A channel object returned by the client, carrying its own permission
/// check and message lookup.
#[async_trait]
pub trait Channel: Send + Sync {
    fn kind(&self) -> ChannelKind;

    /// Guild hosting this channel, if any.
    fn guild_id(&self) -> Option<String>;

    /// Whether the given user holds view-channel permission here.
    fn can_view(&self, user_id: &str) -> bool;

    /// Members of a DM or group DM. Empty for guild channels.
    fn recipients(&self) -> Vec<Recipient>;

    /// Look up a message in this channel by its snowflake id.
    async fn fetch_message(&self, message_id: &str) -> Result<ChatMessage, ScribeError>;
}
