use super::message::MessageId;
use crate::constants::LARGER_THAN_MAX_MESSAGE_ID;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Selection decision produced by the reconciler.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdInfo {
    /// The id the caller asked for, echoed unchanged.
    pub target_id: Option<MessageId>,
    /// Present in the filtered list, safe to select right away.
    pub local_select_id: Option<MessageId>,
    /// The id that should ultimately be selected. May require a fetch.
    /// `LARGER_THAN_MAX_MESSAGE_ID` means "the newest message".
    pub final_select_id: Option<MessageId>,
}

impl IdInfo {
    pub fn new(target_id: Option<MessageId>) -> Self {
        Self {
            target_id,
            ..Self::default()
        }
    }

    /// Nothing can be shown optimistically; the caller must fetch.
    pub fn needs_fetch(&self) -> bool {
        self.local_select_id.is_none()
    }

    pub fn fetch_anchor(&self) -> FetchAnchor {
        match self.final_select_id {
            None => FetchAnchor::FirstUnread,
            Some(LARGER_THAN_MAX_MESSAGE_ID) => FetchAnchor::Newest,
            Some(id) => FetchAnchor::Message(id),
        }
    }
}

/// Where a network fetch for the narrow should be centered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FetchAnchor {
    /// Let the server find the first unread message (or the newest if none).
    FirstUnread,
    Newest,
    Message(MessageId),
}

impl fmt::Display for FetchAnchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FirstUnread => write!(f, "first_unread"),
            Self::Newest => write!(f, "newest"),
            Self::Message(id) => write!(f, "{id}"),
        }
    }
}
