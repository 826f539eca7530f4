use serde::{Deserialize, Serialize};

/// Platform identifiers are "snowflakes": 18-digit decimal strings.
pub fn is_snowflake(s: &str) -> bool {
    s.len() == 18 && s.bytes().all(|b| b.is_ascii_digit())
}

/// The kind of channel a message lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChannelKind {
    GuildText,
    GuildVoice,
    Category,
    Dm,
    GroupDm,
}

impl ChannelKind {
    /// Whether a channel of this kind can hold messages.
    pub fn is_text_capable(&self) -> bool {
        matches!(self, ChannelKind::GuildText | ChannelKind::Dm | ChannelKind::GroupDm)
    }
}

/// How a caller names a principal before resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum UserRef {
    Id { id: String },
    Name { name: String },
}

/// A resolved identity used for access-policy checks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Principal {
    pub id: String,
    pub username: String,
}

/// A member of a DM or group-DM channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipient {
    pub id: String,
    pub username: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_snowflake() {
        assert!(is_snowflake("111111111111111111"));
        assert!(!is_snowflake("11111111111111111")); // 17 digits
        assert!(!is_snowflake("1111111111111111111")); // 19 digits
        assert!(!is_snowflake("11111111111111111a"));
        assert!(!is_snowflake(""));
    }

    #[test]
    fn test_text_capable_kinds() {
        assert!(ChannelKind::GuildText.is_text_capable());
        assert!(ChannelKind::Dm.is_text_capable());
        assert!(ChannelKind::GroupDm.is_text_capable());
        assert!(!ChannelKind::GuildVoice.is_text_capable());
        assert!(!ChannelKind::Category.is_text_capable());
    }

    #[test]
    fn test_user_ref_serialization() {
        let user = UserRef::Name { name: "ada".into() };
        let json = serde_json::to_string(&user).unwrap();
        let back: UserRef = serde_json::from_str(&json).unwrap();
        assert_eq!(back, user);
    }
}
