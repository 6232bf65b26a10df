use crate::models::{Message, MessageId, Narrow, UnreadInfo};
use std::collections::BTreeMap;
use tracing::trace;

/// Computes the first unread message of a narrow.
pub trait UnreadOracle {
    /// A `Found` id must satisfy `narrow.matches`.
    fn first_unread(&self, narrow: &Narrow) -> UnreadInfo;
}

/// Sub-store for unread messages.
///
/// Seeded from the server's unread data, so it knows about unread messages
/// that the message cache has never fetched.
pub struct UnreadStore {
    unread: BTreeMap<MessageId, Message>,
}

impl UnreadStore {
    pub fn new() -> Self {
        Self {
            unread: BTreeMap::new(),
        }
    }

    pub fn clear(&mut self) {
        self.unread.clear();
    }

    // ===== Getters =====

    pub fn is_unread(&self, id: MessageId) -> bool {
        self.unread.contains_key(&id)
    }

    pub fn total_count(&self) -> usize {
        self.unread.len()
    }

    /// Unread messages matching the narrow. `None` when the narrow can't be
    /// evaluated locally.
    pub fn unread_count(&self, narrow: &Narrow) -> Option<usize> {
        if !narrow.unread_computable_locally() {
            return None;
        }
        Some(self.unread.values().filter(|m| narrow.matches(m)).count())
    }

    // ===== Mutations =====

    /// Track the unread ones among freshly received messages.
    pub fn process_loaded_messages<'a, I>(&mut self, messages: I)
    where
        I: IntoIterator<Item = &'a Message>,
    {
        for message in messages {
            if message.is_unread() {
                self.unread.insert(message.id, message.clone());
            }
        }
        trace!(unread = self.unread.len(), "processed loaded messages");
    }

    pub fn mark_as_read(&mut self, ids: &[MessageId]) {
        for id in ids {
            self.unread.remove(id);
        }
    }
}

impl Default for UnreadStore {
    fn default() -> Self {
        Self::new()
    }
}

impl UnreadOracle for UnreadStore {
    fn first_unread(&self, narrow: &Narrow) -> UnreadInfo {
        if !narrow.unread_computable_locally() {
            return UnreadInfo::CannotCompute;
        }
        self.unread
            .values()
            .find(|m| narrow.matches(m))
            .map(|m| UnreadInfo::Found { msg_id: m.id })
            .unwrap_or(UnreadInfo::NotFound)
    }
}
