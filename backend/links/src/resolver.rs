//! Resolve a message link to the message it points at.
//!
//! Two sequential lookups against the chat client (channel, then message),
//! fail-fast with no retries. The access policy runs between them: nobody
//! gets a message out of a channel they could not read in the client.

use logging::redact_tokens;
use scribe_core::{ChannelKind, ChatClient, ChatMessage, ScribeError, UserRef};
use tracing::debug;

use crate::patterns::match_message_link;

/// Who is asking. The reference is resolved through the client before the
/// policy check.
#[derive(Debug, Clone)]
pub struct ResolveOptions {
    pub as_user: UserRef,
}

/// Fetch the message a link points at, on behalf of `opts.as_user`.
///
/// Fails with [`ScribeError::MalformedInput`] before any lookup when the
/// link is not a message link, with [`ScribeError::UnsupportedChannel`] when
/// the target cannot hold messages, and with
/// [`ScribeError::PermissionDenied`] when the principal fails the channel's
/// access policy. A missing message surfaces as the collaborator's own
/// [`ScribeError::NotFound`], unwrapped.
pub async fn resolve_message_link(
    client: &dyn ChatClient,
    link: &str,
    opts: &ResolveOptions,
) -> Result<ChatMessage, ScribeError> {
    let parsed = match_message_link(link).ok_or_else(|| {
        ScribeError::MalformedInput(format!("not a message link: {}", redact_tokens(link)))
    })?;
    debug!(
        guild_id = %parsed.guild_id,
        channel_id = %parsed.channel_id,
        message_id = %parsed.message_id,
        "resolving message link"
    );

    let channel = client.fetch_channel(&parsed.channel_id).await?;
    if !channel.kind().is_text_capable() {
        return Err(ScribeError::UnsupportedChannel(format!(
            "channel {} cannot hold messages",
            parsed.channel_id
        )));
    }

    let principal = client.resolve_user(&opts.as_user).await?;
    match channel.kind() {
        ChannelKind::GuildText => {
            if !channel.can_view(&principal.id) {
                return Err(ScribeError::PermissionDenied(format!(
                    "user {} cannot view channel {}",
                    principal.id, parsed.channel_id
                )));
            }
        }
        ChannelKind::Dm => {
            let recipients = channel.recipients();
            let sole = recipients.len() == 1 && recipients[0].id == principal.id;
            if !sole {
                return Err(ScribeError::PermissionDenied(format!(
                    "user {} is not the recipient of DM channel {}",
                    principal.id, parsed.channel_id
                )));
            }
        }
        ChannelKind::GroupDm => {
            let known = channel
                .recipients()
                .iter()
                .any(|r| r.username == principal.username);
            if !known {
                return Err(ScribeError::PermissionDenied(format!(
                    "user {} is not in group DM channel {}",
                    principal.username, parsed.channel_id
                )));
            }
        }
        kind => {
            return Err(ScribeError::UnsupportedChannel(format!(
                "channel {} has kind {:?}",
                parsed.channel_id, kind
            )));
        }
    }

    debug!(message_id = %parsed.message_id, "access granted, fetching message");
    channel.fetch_message(&parsed.message_id).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::Utc;
    use scribe_core::{Channel, Principal, Recipient};
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    const GUILD: &str = "111111111111111111";
    const CHANNEL: &str = "222222222222222222";
    const MESSAGE: &str = "333333333333333333";
    const USER: &str = "444444444444444444";

    fn message_url() -> String {
        format!("https://discord.com/channels/{GUILD}/{CHANNEL}/{MESSAGE}")
    }

    fn sample_message() -> ChatMessage {
        ChatMessage {
            id: MESSAGE.into(),
            channel_id: CHANNEL.into(),
            author: Recipient { id: USER.into(), username: "ada".into() },
            content: "hello".into(),
            timestamp: Utc::now(),
        }
    }

    struct FakeChannel {
        kind: ChannelKind,
        viewable: bool,
        recipients: Vec<Recipient>,
        message_fetched: Arc<AtomicBool>,
    }

    #[async_trait]
    impl Channel for FakeChannel {
        fn kind(&self) -> ChannelKind {
            self.kind
        }
        fn guild_id(&self) -> Option<String> {
            matches!(self.kind, ChannelKind::GuildText).then(|| GUILD.to_string())
        }
        fn can_view(&self, _user_id: &str) -> bool {
            self.viewable
        }
        fn recipients(&self) -> Vec<Recipient> {
            self.recipients.clone()
        }
        async fn fetch_message(&self, message_id: &str) -> Result<ChatMessage, ScribeError> {
            self.message_fetched.store(true, Ordering::SeqCst);
            if message_id == MESSAGE {
                Ok(sample_message())
            } else {
                Err(ScribeError::NotFound(format!("message {message_id}")))
            }
        }
    }

    struct FakeClient {
        kind: ChannelKind,
        viewable: bool,
        recipients: Vec<Recipient>,
        channel_fetched: Arc<AtomicBool>,
        message_fetched: Arc<AtomicBool>,
    }

    impl FakeClient {
        fn guild(viewable: bool) -> Self {
            FakeClient {
                kind: ChannelKind::GuildText,
                viewable,
                recipients: Vec::new(),
                channel_fetched: Arc::new(AtomicBool::new(false)),
                message_fetched: Arc::new(AtomicBool::new(false)),
            }
        }

        fn with_kind(kind: ChannelKind, recipients: Vec<Recipient>) -> Self {
            FakeClient {
                kind,
                viewable: false,
                recipients,
                channel_fetched: Arc::new(AtomicBool::new(false)),
                message_fetched: Arc::new(AtomicBool::new(false)),
            }
        }
    }

    #[async_trait]
    impl ChatClient for FakeClient {
        async fn fetch_channel(
            &self,
            channel_id: &str,
        ) -> Result<Box<dyn Channel>, ScribeError> {
            self.channel_fetched.store(true, Ordering::SeqCst);
            if channel_id != CHANNEL {
                return Err(ScribeError::NotFound(format!("channel {channel_id}")));
            }
            Ok(Box::new(FakeChannel {
                kind: self.kind,
                viewable: self.viewable,
                recipients: self.recipients.clone(),
                message_fetched: self.message_fetched.clone(),
            }))
        }

        async fn resolve_user(&self, user: &UserRef) -> Result<Principal, ScribeError> {
            let principal = match user {
                UserRef::Id { id } => Principal { id: id.clone(), username: "ada".into() },
                UserRef::Name { name } => {
                    Principal { id: USER.into(), username: name.clone() }
                }
            };
            Ok(principal)
        }
    }

    fn as_user() -> ResolveOptions {
        ResolveOptions { as_user: UserRef::Id { id: USER.into() } }
    }

    #[tokio::test]
    async fn happy_path_fetches_channel_then_message() {
        let client = FakeClient::guild(true);
        let msg = resolve_message_link(&client, &message_url(), &as_user())
            .await
            .unwrap();
        assert_eq!(msg.id, MESSAGE);
        assert!(client.channel_fetched.load(Ordering::SeqCst));
        assert!(client.message_fetched.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn malformed_link_fails_before_any_lookup() {
        let client = FakeClient::guild(true);
        let err = resolve_message_link(&client, "not a link", &as_user())
            .await
            .unwrap_err();
        assert!(matches!(err, ScribeError::MalformedInput(_)));
        assert!(!client.channel_fetched.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn permission_denied_stops_before_message_fetch() {
        let client = FakeClient::guild(false);
        let err = resolve_message_link(&client, &message_url(), &as_user())
            .await
            .unwrap_err();
        assert!(matches!(err, ScribeError::PermissionDenied(_)));
        assert!(client.channel_fetched.load(Ordering::SeqCst));
        assert!(!client.message_fetched.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn voice_channel_is_unsupported() {
        let client = FakeClient::with_kind(ChannelKind::GuildVoice, Vec::new());
        let err = resolve_message_link(&client, &message_url(), &as_user())
            .await
            .unwrap_err();
        assert!(matches!(err, ScribeError::UnsupportedChannel(_)));
        assert!(!client.message_fetched.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn dm_requires_sole_recipient() {
        let me = Recipient { id: USER.into(), username: "ada".into() };
        let other = Recipient { id: "555555555555555555".into(), username: "bob".into() };

        let client = FakeClient::with_kind(ChannelKind::Dm, vec![me.clone()]);
        assert!(resolve_message_link(&client, &message_url(), &as_user())
            .await
            .is_ok());

        let client = FakeClient::with_kind(ChannelKind::Dm, vec![other.clone()]);
        let err = resolve_message_link(&client, &message_url(), &as_user())
            .await
            .unwrap_err();
        assert!(matches!(err, ScribeError::PermissionDenied(_)));

        // two recipients means it is not this principal's DM
        let client = FakeClient::with_kind(ChannelKind::Dm, vec![me, other]);
        let err = resolve_message_link(&client, &message_url(), &as_user())
            .await
            .unwrap_err();
        assert!(matches!(err, ScribeError::PermissionDenied(_)));
    }

    #[tokio::test]
    async fn group_dm_matches_on_username() {
        let members = vec![
            Recipient { id: "555555555555555555".into(), username: "bob".into() },
            Recipient { id: "666666666666666666".into(), username: "ada".into() },
        ];
        let client = FakeClient::with_kind(ChannelKind::GroupDm, members.clone());
        assert!(resolve_message_link(&client, &message_url(), &as_user())
            .await
            .is_ok());

        let opts = ResolveOptions { as_user: UserRef::Name { name: "carol".into() } };
        let client = FakeClient::with_kind(ChannelKind::GroupDm, members);
        let err = resolve_message_link(&client, &message_url(), &opts)
            .await
            .unwrap_err();
        assert!(matches!(err, ScribeError::PermissionDenied(_)));
    }

    #[tokio::test]
    async fn missing_message_propagates_not_found() {
        let client = FakeClient::guild(true);
        let url = format!(
            "https://discord.com/channels/{GUILD}/{CHANNEL}/999999999999999999"
        );
        let err = resolve_message_link(&client, &url, &as_user()).await.unwrap_err();
        assert!(matches!(err, ScribeError::NotFound(_)));
    }

    #[tokio::test]
    async fn missing_channel_propagates_not_found() {
        let client = FakeClient::guild(true);
        let url = format!(
            "https://discord.com/channels/{GUILD}/888888888888888888/{MESSAGE}"
        );
        let err = resolve_message_link(&client, &url, &as_user()).await.unwrap_err();
        assert!(matches!(err, ScribeError::NotFound(_)));
        assert!(!client.message_fetched.load(Ordering::SeqCst));
    }
}
