use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::Recipient;

/// A message fetched from the message-store collaborator.
///
/// The collaborator owns the record; Scribe only passes it along to
/// archival and rendering consumers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub id: String,
    pub channel_id: String,
    pub author: Recipient,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_serialization() {
        let msg = ChatMessage {
            id: "333333333333333333".into(),
            channel_id: "222222222222222222".into(),
            author: Recipient {
                id: "444444444444444444".into(),
                username: "ada".into(),
            },
            content: "hello".into(),
            timestamp: Utc::now(),
        };
        let json = serde_json::to_string(&msg).unwrap();
        let back: ChatMessage = serde_json::from_str(&json).unwrap();
        assert_eq!(back, msg);
        assert!(json.contains("channelId"));
    }
}
