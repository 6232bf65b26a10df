use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use narrow_core::models::{Message, MessageId};
use narrow_core::{CoreConfig, MessageStore, UnreadStore};
use serde::{Deserialize, Serialize};

/// Environment variable consulted when `--snapshot` is not given
pub const SNAPSHOT_ENV_VAR: &str = "NARROW_CLI_SNAPSHOT";

/// Local client state loaded from a JSON file
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    /// Current user and mute settings
    #[serde(flatten)]
    pub config: CoreConfig,

    /// The message cache is known to reach the newest message
    #[serde(default)]
    pub has_found_newest: bool,

    /// Cached messages, in any order
    #[serde(default)]
    pub messages: Vec<Message>,

    /// Cached messages that must not be shown
    #[serde(default)]
    pub hidden_ids: Vec<MessageId>,

    /// Unread messages the cache hasn't fetched yet
    #[serde(default)]
    pub unread_messages: Vec<Message>,
}

impl Snapshot {
    /// Load a snapshot from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read snapshot file: {}", path.display()))?;
        let snapshot: Snapshot = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse snapshot file: {}", path.display()))?;
        Ok(snapshot)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Failed to deserialize snapshot")
    }

    pub fn core_config(&self) -> Arc<CoreConfig> {
        Arc::new(self.config.clone())
    }

    pub fn message_store(&self) -> MessageStore {
        let mut store = MessageStore::new();
        store.add_messages(self.messages.iter().cloned());
        for id in &self.hidden_ids {
            store.hide_message(*id);
        }
        store.set_found_newest(self.has_found_newest);
        store
    }

    pub fn unread_store(&self) -> UnreadStore {
        let mut unread = UnreadStore::new();
        unread.process_loaded_messages(self.messages.iter().chain(&self.unread_messages));
        unread
    }
}

/// `--snapshot` wins over the environment variable
pub fn snapshot_path(cli_arg: Option<PathBuf>) -> Option<PathBuf> {
    cli_arg.or_else(|| std::env::var_os(SNAPSHOT_ENV_VAR).map(PathBuf::from))
}

#[cfg(test)]
mod tests {
    use super::*;
    use narrow_core::SupersetCache;
    use std::io::Write;

    const SNAPSHOT: &str = r#"{
        "currentUserId": 1,
        "mutedTopics": [{"stream": "general", "topic": "bots"}],
        "hasFoundNewest": true,
        "messages": [
            {"id": 30, "senderId": 2, "recipient": {"type": "stream", "stream": "general", "topic": "chat"}, "flags": {"read": true}},
            {"id": 10, "senderId": 2, "recipient": {"type": "private", "userIds": [1, 2]}}
        ],
        "hiddenIds": [30],
        "unreadMessages": [
            {"id": 99, "senderId": 3, "recipient": {"type": "stream", "stream": "general", "topic": "chat"}}
        ]
    }"#;

    #[test]
    fn test_parse_snapshot() {
        let snapshot = Snapshot::from_json(SNAPSHOT).unwrap();
        assert_eq!(snapshot.config.current_user_id, Some(1));
        assert!(snapshot.config.is_topic_muted("general", "bots"));
        assert!(snapshot.has_found_newest);
        assert_eq!(snapshot.messages.len(), 2);
        assert_eq!(snapshot.hidden_ids, vec![30]);
    }

    #[test]
    fn test_parse_snapshot_minimal() {
        let snapshot = Snapshot::from_json("{}").unwrap();
        assert!(snapshot.config.current_user_id.is_none());
        assert!(!snapshot.has_found_newest);
        assert!(snapshot.messages.is_empty());
    }

    #[test]
    fn test_stores_from_snapshot() {
        let snapshot = Snapshot::from_json(SNAPSHOT).unwrap();

        let store = snapshot.message_store();
        let ids: Vec<_> = store.all_messages().iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![10]);
        assert!(store.is_hidden(30));
        assert_eq!(store.len(), 2);
        assert!(store.has_found_newest());

        let unread = snapshot.unread_store();
        assert!(unread.is_unread(10));
        assert!(unread.is_unread(99));
        assert!(!unread.is_unread(30));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SNAPSHOT.as_bytes()).unwrap();

        let snapshot = Snapshot::load(file.path()).unwrap();
        assert_eq!(snapshot.messages.len(), 2);
    }

    #[test]
    fn test_load_reports_path_on_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.json");
        let err = Snapshot::load(&path).unwrap_err();
        assert!(err.to_string().contains("missing.json"));
    }

    #[test]
    fn test_snapshot_path_prefers_cli_arg() {
        let path = snapshot_path(Some(PathBuf::from("/tmp/a.json")));
        assert_eq!(path, Some(PathBuf::from("/tmp/a.json")));
    }
}
