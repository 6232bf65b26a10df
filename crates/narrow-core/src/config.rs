use crate::models::UserId;
use serde::{Deserialize, Serialize};

/// A (stream, topic) pair the user has muted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MutedTopic {
    pub stream: String,
    pub topic: String,
}

/// Per-user context a narrow needs to evaluate its predicate.
///
/// Bound into a [`Narrow`](crate::models::Narrow) at parse time so that
/// `Narrow::matches` only ever takes the message.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoreConfig {
    /// The user the client is logged in as. Needed for `me` operands and
    /// for comparing direct-message participant sets.
    #[serde(default)]
    pub current_user_id: Option<UserId>,

    #[serde(default)]
    pub muted_streams: Vec<String>,

    #[serde(default)]
    pub muted_topics: Vec<MutedTopic>,
}

impl CoreConfig {
    pub fn new(current_user_id: Option<UserId>) -> Self {
        Self {
            current_user_id,
            ..Self::default()
        }
    }

    pub fn with_muted_stream(mut self, stream: impl Into<String>) -> Self {
        self.muted_streams.push(stream.into());
        self
    }

    pub fn with_muted_topic(mut self, stream: impl Into<String>, topic: impl Into<String>) -> Self {
        self.muted_topics.push(MutedTopic {
            stream: stream.into(),
            topic: topic.into(),
        });
        self
    }

    /// Stream names compare case-insensitively.
    pub fn is_stream_muted(&self, stream: &str) -> bool {
        let stream = stream.to_lowercase();
        self.muted_streams.iter().any(|s| s.to_lowercase() == stream)
    }

    pub fn is_topic_muted(&self, stream: &str, topic: &str) -> bool {
        let stream = stream.to_lowercase();
        let topic = topic.to_lowercase();
        self.muted_topics
            .iter()
            .any(|m| m.stream.to_lowercase() == stream && m.topic.to_lowercase() == topic)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config_minimal() {
        let config: CoreConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, CoreConfig::default());
    }

    #[test]
    fn test_parse_config_camel_case() {
        let json = r#"{
            "currentUserId": 7,
            "mutedStreams": ["noise"],
            "mutedTopics": [{"stream": "general", "topic": "bots"}]
        }"#;
        let config: CoreConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.current_user_id, Some(7));
        assert!(config.is_stream_muted("Noise"));
        assert!(config.is_topic_muted("General", "BOTS"));
        assert!(!config.is_topic_muted("general", "lunch"));
    }
}
