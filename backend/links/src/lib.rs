//! Platform link decomposition and message-link resolution.
//!
//! Four URL families (guild, channel, message, webhook) share a handful of
//! pattern fragments; `patterns` assembles them into compiled matchers and
//! `resolver` turns a matched message link into the message itself, behind
//! the access policy of the channel that holds it.

pub mod patterns;
pub mod resolver;

pub use patterns::{
    match_channel_link, match_guild_link, match_link, match_message_link, match_webhook_link,
    ChannelLink, GuildLink, LinkMatch, MessageLink, WebhookLink,
};
pub use resolver::{resolve_message_link, ResolveOptions};
