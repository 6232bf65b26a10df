use serde::{Deserialize, Serialize};

/// Server-assigned message id. Positive, monotonically assigned, never reused.
pub type MessageId = u64;

pub type UserId = u64;

/// Where a message was sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum Recipient {
    Stream { stream: String, topic: String },
    /// Direct message. `user_ids` lists every participant, sender included.
    Private { user_ids: Vec<UserId> },
}

/// Per-user message flags as reported by the server.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MessageFlags {
    pub read: bool,
    pub starred: bool,
    pub mentioned: bool,
    /// One of the user's alert words appears in the message
    pub has_alert_word: bool,
    pub has_link: bool,
    pub has_attachment: bool,
    pub has_image: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: MessageId,
    pub sender_id: UserId,
    pub recipient: Recipient,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub flags: MessageFlags,
}

impl Message {
    pub fn stream(
        id: MessageId,
        sender_id: UserId,
        stream: impl Into<String>,
        topic: impl Into<String>,
    ) -> Self {
        Self {
            id,
            sender_id,
            recipient: Recipient::Stream {
                stream: stream.into(),
                topic: topic.into(),
            },
            content: String::new(),
            flags: MessageFlags::default(),
        }
    }

    pub fn private(id: MessageId, sender_id: UserId, user_ids: Vec<UserId>) -> Self {
        Self {
            id,
            sender_id,
            recipient: Recipient::Private { user_ids },
            content: String::new(),
            flags: MessageFlags::default(),
        }
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    pub fn with_flags(mut self, flags: MessageFlags) -> Self {
        self.flags = flags;
        self
    }

    pub fn is_private(&self) -> bool {
        matches!(self.recipient, Recipient::Private { .. })
    }

    pub fn stream_name(&self) -> Option<&str> {
        match &self.recipient {
            Recipient::Stream { stream, .. } => Some(stream),
            Recipient::Private { .. } => None,
        }
    }

    pub fn topic(&self) -> Option<&str> {
        match &self.recipient {
            Recipient::Stream { topic, .. } => Some(topic),
            Recipient::Private { .. } => None,
        }
    }

    /// Participants of a direct message, sender included.
    /// Empty for stream messages.
    pub fn participants(&self) -> Vec<UserId> {
        match &self.recipient {
            Recipient::Private { user_ids } => {
                let mut ids = user_ids.clone();
                if !ids.contains(&self.sender_id) {
                    ids.push(self.sender_id);
                }
                ids.sort_unstable();
                ids.dedup();
                ids
            }
            Recipient::Stream { .. } => Vec::new(),
        }
    }

    pub fn is_unread(&self) -> bool {
        !self.flags.read
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_participants_include_sender() {
        let msg = Message::private(10, 3, vec![5, 5, 1]);
        assert_eq!(msg.participants(), vec![1, 3, 5]);
    }

    #[test]
    fn test_stream_message_accessors() {
        let msg = Message::stream(11, 2, "general", "lunch");
        assert_eq!(msg.stream_name(), Some("general"));
        assert_eq!(msg.topic(), Some("lunch"));
        assert!(!msg.is_private());
        assert!(msg.participants().is_empty());
    }

    #[test]
    fn test_deserialize_defaults_flags() {
        let json = r#"{
            "id": 42,
            "senderId": 1,
            "recipient": {"type": "stream", "stream": "one", "topic": "whatever"}
        }"#;
        let msg: Message = serde_json::from_str(json).unwrap();
        assert_eq!(msg.id, 42);
        assert!(msg.is_unread());
        assert_eq!(msg.flags, MessageFlags::default());
        assert!(msg.content.is_empty());
    }

    #[test]
    fn test_serialize_uses_camel_case() {
        let msg = Message::private(7, 2, vec![1, 2]).with_flags(MessageFlags {
            has_alert_word: true,
            ..MessageFlags::default()
        });
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["senderId"], 2);
        assert_eq!(
            json["recipient"],
            serde_json::json!({"type": "private", "userIds": [1, 2]})
        );
        assert_eq!(json["flags"]["hasAlertWord"], true);

        let back: Message = serde_json::from_value(json).unwrap();
        assert_eq!(back, msg);
    }
}
