use narrow_core::models::{IdInfo, MessageId, Term, UnreadInfo};
use serde::Serialize;

/// CLI command parsed from arguments
#[derive(Debug, Clone)]
pub enum CliCommand {
    /// Show the parsed terms and derived properties of a narrow
    Parse { narrow: String },
    /// Reconcile a narrow against the snapshot
    Reconcile {
        narrow: String,
        target_id: Option<MessageId>,
    },
    /// Show the first unread message and unread count of a narrow
    Unread { narrow: String },
}

impl CliCommand {
    /// Whether the command reads local client state
    pub fn needs_snapshot(&self) -> bool {
        !matches!(self, CliCommand::Parse { .. })
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseOutput {
    pub narrow: String,
    pub terms: Vec<Term>,
    pub is_anchored_near: bool,
    pub unread_computable_locally: bool,
    pub excludes_muted_topics: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconcileOutput {
    pub narrow: String,
    pub id_info: IdInfo,
    pub fetch_anchor: String,
    pub needs_fetch: bool,
    pub message_ids: Vec<MessageId>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnreadOutput {
    pub narrow: String,
    pub first_unread: UnreadInfo,
    /// `None` when only the server can count
    pub unread_count: Option<usize>,
}
