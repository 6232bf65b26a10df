use super::message::MessageId;
use serde::{Deserialize, Serialize};

/// First-unread answer for a narrow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "flavor", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum UnreadInfo {
    /// Lowest unread id matching the narrow. It satisfies the narrow but need
    /// not be in the local message cache.
    Found { msg_id: MessageId },
    NotFound,
    /// The narrow can only be evaluated by the server.
    CannotCompute,
}

impl UnreadInfo {
    pub fn found_id(&self) -> Option<MessageId> {
        match self {
            Self::Found { msg_id } => Some(*msg_id),
            Self::NotFound | Self::CannotCompute => None,
        }
    }
}
