use crate::models::{Message, MessageId};
use std::collections::HashSet;
use tracing::{trace, warn};

/// Read access to the locally held superset of messages.
///
/// Implementations keep messages in ascending id order without duplicates.
pub trait SupersetCache {
    /// The cache is known to reach the true newest message.
    fn has_found_newest(&self) -> bool;

    /// Nothing usable is held. May be true even when messages are stored,
    /// e.g. when every stored message is hidden.
    fn is_visibly_empty(&self) -> bool;

    /// Every usable message, ascending by id. Hidden messages are left out.
    fn all_messages(&self) -> &[Message];

    fn first(&self) -> Option<&Message> {
        self.all_messages().first()
    }

    fn last(&self) -> Option<&Message> {
        self.all_messages().last()
    }
}

/// Application-wide store of every message the client has received.
pub struct MessageStore {
    messages: Vec<Message>,
    /// `messages` minus `hidden_ids`, rebuilt on every mutation
    visible: Vec<Message>,
    ids: HashSet<MessageId>,
    /// Messages that are stored but must not be shown (e.g. from muted users)
    hidden_ids: HashSet<MessageId>,
    found_newest: bool,
}

impl MessageStore {
    pub fn new() -> Self {
        Self {
            messages: Vec::new(),
            visible: Vec::new(),
            ids: HashSet::new(),
            hidden_ids: HashSet::new(),
            found_newest: false,
        }
    }

    pub fn clear(&mut self) {
        self.messages.clear();
        self.visible.clear();
        self.ids.clear();
        self.hidden_ids.clear();
        self.found_newest = false;
    }

    // ===== Getters =====

    pub fn get(&self, id: MessageId) -> Option<&Message> {
        if !self.contains(id) {
            return None;
        }
        self.messages
            .binary_search_by_key(&id, |m| m.id)
            .ok()
            .map(|idx| &self.messages[idx])
    }

    pub fn contains(&self, id: MessageId) -> bool {
        self.ids.contains(&id)
    }

    pub fn is_hidden(&self, id: MessageId) -> bool {
        self.hidden_ids.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    // ===== Mutations =====

    /// Insert messages, keeping ascending order. Already-known ids are
    /// skipped. Returns how many were added.
    pub fn add_messages<I>(&mut self, messages: I) -> usize
    where
        I: IntoIterator<Item = Message>,
    {
        let mut added = 0;
        for message in messages {
            if !self.ids.insert(message.id) {
                trace!(id = message.id, "skipping duplicate message");
                continue;
            }
            // Common case: new messages land past the tail.
            match self.messages.last() {
                Some(last) if last.id > message.id => {
                    let pos = self.messages.partition_point(|m| m.id < message.id);
                    self.messages.insert(pos, message);
                }
                _ => self.messages.push(message),
            }
            added += 1;
        }
        if added > 0 {
            self.rebuild_visible();
        }
        trace!(added, total = self.messages.len(), "added messages to store");
        added
    }

    pub fn set_found_newest(&mut self, found_newest: bool) {
        self.found_newest = found_newest;
    }

    pub fn hide_message(&mut self, id: MessageId) {
        if !self.contains(id) {
            warn!(id, "hiding a message that is not in the store");
        }
        if self.hidden_ids.insert(id) {
            self.rebuild_visible();
        }
    }

    pub fn unhide_message(&mut self, id: MessageId) {
        if self.hidden_ids.remove(&id) {
            self.rebuild_visible();
        }
    }

    fn rebuild_visible(&mut self) {
        let visible: Vec<Message> = self
            .messages
            .iter()
            .filter(|m| !self.is_hidden(m.id))
            .cloned()
            .collect();
        self.visible = visible;
    }
}

impl Default for MessageStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SupersetCache for MessageStore {
    fn has_found_newest(&self) -> bool {
        self.found_newest
    }

    fn is_visibly_empty(&self) -> bool {
        self.visible.is_empty()
    }

    fn all_messages(&self) -> &[Message] {
        &self.visible
    }
}
