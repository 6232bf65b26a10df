//! Crate-wide constants
//!
//! Centralized location for sentinel values and operand spellings
//! that are shared between the narrow parser, the stores and the reconciler.

use crate::models::MessageId;

/// Reserved id larger than any message id the server will ever assign.
///
/// Used as `final_select_id` when the newest message should be selected but
/// nothing local can tell us which one that is. Existing callers compare
/// against this exact value, so it must not change.
pub const LARGER_THAN_MAX_MESSAGE_ID: MessageId = 10_000_000_000_000_000;

/// Prefix the server puts on topics that were marked as resolved.
pub const RESOLVED_TOPIC_PREFIX: &str = "✔ ";

/// Operand that resolves to the current user for user-valued operators.
pub const ME_OPERAND: &str = "me";

// Operator spellings accepted by the narrow parser
pub mod operators {
    pub const STREAM: &str = "stream";
    pub const CHANNEL: &str = "channel";
    pub const TOPIC: &str = "topic";
    pub const SUBJECT: &str = "subject";
    pub const NEAR: &str = "near";
    pub const ID: &str = "id";
    pub const IS: &str = "is";
    pub const HAS: &str = "has";
    pub const IN: &str = "in";
    pub const SENDER: &str = "sender";
    pub const FROM: &str = "from";
    pub const DM: &str = "dm";
    pub const PM_WITH: &str = "pm-with";
    pub const DM_INCLUDING: &str = "dm-including";
    pub const GROUP_PM_WITH: &str = "group-pm-with";
    pub const SEARCH: &str = "search";
}
