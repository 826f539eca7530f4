//! Structural matchers for platform URLs.
//!
//! The four families are built from shared fragments rather than four
//! hand-written regexes: a snowflake, the web base (optional scheme,
//! optional `canary`/`ptb` release-channel tag, fixed host), and the
//! client-protocol base. The composed patterns are compiled once and
//! exercised by the unit tests below, so a bad composition fails in CI
//! rather than on first use.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde::Serialize;

/// Platform ids are 18-digit decimal snowflakes.
const SNOWFLAKE: &str = r"[0-9]{18}";
/// `https://canary.discord.com`-style web prefix; scheme and release channel
/// are both optional.
const WEB_BASE: &str = r"(?:(?P<scheme>https?)://)?(?:(?P<version>canary|ptb)\.)?discord\.com";
/// The desktop client registers its own URI scheme; `-` stands in for the
/// host.
const PROTOCOL_BASE: &str = r"(?P<protocol>discord)://-";

fn base() -> String {
    format!("(?:{WEB_BASE}|{PROTOCOL_BASE})")
}

fn guild_segment() -> String {
    // `@me` addresses the caller's own DM pseudo-guild
    format!("{}/channels/(?P<guild>@me|{SNOWFLAKE})", base())
}

fn channel_segment() -> String {
    format!("{}/(?P<channel>{SNOWFLAKE})", guild_segment())
}

static GUILD_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(&format!("^{}/?$", guild_segment())).unwrap());
static CHANNEL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(&format!("^{}/?$", channel_segment())).unwrap());
static MESSAGE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!("^{}/(?P<message>{SNOWFLAKE})/?$", channel_segment())).unwrap()
});
static WEBHOOK_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        "^{}/api/webhooks/(?P<id>{SNOWFLAKE})(?:/(?P<token>[A-Za-z0-9_-]+))?/?$",
        base()
    ))
    .unwrap()
});

/// A link to a guild.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GuildLink {
    pub scheme: Option<String>,
    pub version: Option<String>,
    /// A snowflake, or the literal `@me`.
    pub guild_id: String,
}

/// A link to a channel within a guild (or the DM pseudo-guild).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelLink {
    pub scheme: Option<String>,
    pub version: Option<String>,
    pub guild_id: String,
    pub channel_id: String,
}

/// A link to a single message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageLink {
    pub scheme: Option<String>,
    pub version: Option<String>,
    pub guild_id: String,
    pub channel_id: String,
    pub message_id: String,
}

/// A webhook endpoint, with its token when the link carries one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookLink {
    pub scheme: Option<String>,
    pub version: Option<String>,
    pub webhook_id: String,
    pub webhook_token: Option<String>,
}

/// Any recognized platform link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum LinkMatch {
    Message(MessageLink),
    Channel(ChannelLink),
    Guild(GuildLink),
    Webhook(WebhookLink),
}

fn group(caps: &Captures<'_>, name: &str) -> Option<String> {
    caps.name(name).map(|m| m.as_str().to_string())
}

fn scheme_of(caps: &Captures<'_>) -> Option<String> {
    group(caps, "scheme").or_else(|| group(caps, "protocol"))
}

pub fn match_guild_link(input: &str) -> Option<GuildLink> {
    let caps = GUILD_RE.captures(input)?;
    Some(GuildLink {
        scheme: scheme_of(&caps),
        version: group(&caps, "version"),
        guild_id: group(&caps, "guild")?,
    })
}

pub fn match_channel_link(input: &str) -> Option<ChannelLink> {
    let caps = CHANNEL_RE.captures(input)?;
    Some(ChannelLink {
        scheme: scheme_of(&caps),
        version: group(&caps, "version"),
        guild_id: group(&caps, "guild")?,
        channel_id: group(&caps, "channel")?,
    })
}

pub fn match_message_link(input: &str) -> Option<MessageLink> {
    let caps = MESSAGE_RE.captures(input)?;
    Some(MessageLink {
        scheme: scheme_of(&caps),
        version: group(&caps, "version"),
        guild_id: group(&caps, "guild")?,
        channel_id: group(&caps, "channel")?,
        message_id: group(&caps, "message")?,
    })
}

pub fn match_webhook_link(input: &str) -> Option<WebhookLink> {
    let caps = WEBHOOK_RE.captures(input)?;
    Some(WebhookLink {
        scheme: scheme_of(&caps),
        version: group(&caps, "version"),
        webhook_id: group(&caps, "id")?,
        webhook_token: group(&caps, "token"),
    })
}

/// Try every family, most specific first.
pub fn match_link(input: &str) -> Option<LinkMatch> {
    if let Some(link) = match_message_link(input) {
        return Some(LinkMatch::Message(link));
    }
    if let Some(link) = match_channel_link(input) {
        return Some(LinkMatch::Channel(link));
    }
    if let Some(link) = match_guild_link(input) {
        return Some(LinkMatch::Guild(link));
    }
    match_webhook_link(input).map(LinkMatch::Webhook)
}
