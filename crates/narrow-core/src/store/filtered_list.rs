use crate::models::{Message, MessageId};
use std::collections::HashSet;
use tracing::warn;

/// Messages of one narrow, in the order they were appended, unique by id.
///
/// Built fresh for every reconciliation and owned by the caller afterwards.
#[derive(Debug, Clone, Default)]
pub struct FilteredMessageList {
    messages: Vec<Message>,
    ids: HashSet<MessageId>,
}

impl FilteredMessageList {
    pub fn new() -> Self {
        Self::default()
    }

    // ===== Getters =====

    pub fn all(&self) -> &[Message] {
        &self.messages
    }

    pub fn contains(&self, id: MessageId) -> bool {
        self.ids.contains(&id)
    }

    pub fn get(&self, id: MessageId) -> Option<&Message> {
        if !self.contains(id) {
            return None;
        }
        self.messages.iter().find(|m| m.id == id)
    }

    pub fn first(&self) -> Option<&Message> {
        self.messages.first()
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn ids(&self) -> Vec<MessageId> {
        self.messages.iter().map(|m| m.id).collect()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    // ===== Mutations =====

    /// Add to the tail unless the id is already present.
    /// Returns whether the message was added.
    pub fn append(&mut self, message: Message) -> bool {
        if !self.ids.insert(message.id) {
            return false;
        }
        if let Some(last) = self.messages.last() {
            if last.id > message.id {
                warn!(
                    id = message.id,
                    last_id = last.id,
                    "appending message out of id order"
                );
            }
        }
        self.messages.push(message);
        true
    }

    /// Append each message in turn. Returns how many were added.
    pub fn add_messages<I>(&mut self, messages: I) -> usize
    where
        I: IntoIterator<Item = Message>,
    {
        messages
            .into_iter()
            .map(|message| self.append(message))
            .filter(|added| *added)
            .count()
    }
}
