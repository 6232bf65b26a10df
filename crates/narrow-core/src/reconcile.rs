//! Local reconciliation of a narrow against the message cache.
//!
//! Given a narrow, an optional target id, the superset cache and the unread
//! oracle, [`reconcile`] builds the best local message list for the narrow
//! and decides which message to select before any fetch completes.
//!
//! # Decision order
//! 1. Narrows whose unread state is server-only (search) never touch the
//!    cache, whatever the oracle answers. The target wins, otherwise the
//!    newest message is assumed.
//! 2. Matching cache messages are copied into a fresh [`FilteredMessageList`]
//!    unless the cache is visibly empty.
//! 3. Anchored (`near`) narrows always select the target. Other narrows take
//!    the first unread, then the target, then the last local message when the
//!    cache is known to reach the newest message, and otherwise nothing.
//!
//! `local_select_id` is only ever set to an id present in the returned list.

use crate::constants::LARGER_THAN_MAX_MESSAGE_ID;
use crate::models::{IdInfo, MessageId, Narrow, UnreadInfo};
use crate::store::{FilteredMessageList, SupersetCache, UnreadOracle};
use tracing::{debug, trace};

/// Which rule produced the selection. Logged with every decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SelectionRule {
    ServerOnly,
    Anchor,
    FirstUnread,
    Target,
    LastLocal,
    Undetermined,
}

/// Reconcile `narrow` against the local cache.
///
/// Never fails: every combination of missing information maps to a defined
/// `IdInfo`. The returned `target_id` is always the `target_id` passed in.
pub fn reconcile<C, O>(
    narrow: &Narrow,
    target_id: Option<MessageId>,
    cache: &C,
    oracle: &O,
) -> (IdInfo, FilteredMessageList)
where
    C: SupersetCache + ?Sized,
    O: UnreadOracle + ?Sized,
{
    let mut id_info = IdInfo::new(target_id);
    let mut list = FilteredMessageList::new();

    let unread_info = oracle.first_unread(narrow);
    if unread_info == UnreadInfo::CannotCompute || !narrow.unread_computable_locally() {
        // Local data can't be filtered by a server-only predicate, so the
        // cache is left untouched.
        id_info.final_select_id = Some(target_id.unwrap_or(LARGER_THAN_MAX_MESSAGE_ID));
        log_decision(narrow, SelectionRule::ServerOnly, &id_info, &list);
        return (id_info, list);
    }

    materialize(narrow, cache, &mut list);

    let rule = if narrow.is_anchored_near() {
        select_if_local(&mut id_info, target_id, &list);
        SelectionRule::Anchor
    } else if let Some(msg_id) = unread_info.found_id() {
        select_if_local(&mut id_info, Some(msg_id), &list);
        SelectionRule::FirstUnread
    } else if target_id.is_some() {
        select_if_local(&mut id_info, target_id, &list);
        SelectionRule::Target
    } else if cache.has_found_newest() {
        // Both ids stay undefined when nothing local matches.
        let last_id = list.last().map(|m| m.id);
        id_info.final_select_id = last_id;
        id_info.local_select_id = last_id;
        SelectionRule::LastLocal
    } else {
        SelectionRule::Undetermined
    };

    log_decision(narrow, rule, &id_info, &list);
    (id_info, list)
}

/// The `near` operand wins over a caller-supplied id.
pub fn resolve_target_id(narrow: &Narrow, requested: Option<MessageId>) -> Option<MessageId> {
    narrow.near_target().or(requested)
}

/// Copy every matching cache message into `list`, in cache order.
fn materialize<C>(narrow: &Narrow, cache: &C, list: &mut FilteredMessageList)
where
    C: SupersetCache + ?Sized,
{
    if cache.is_visibly_empty() {
        trace!("superset cache is visibly empty, nothing to materialize");
        return;
    }

    for message in cache.all_messages() {
        if narrow.matches(message) {
            list.append(message.clone());
        }
    }
    trace!(matched = list.len(), "materialized local messages");
}

/// `final_select_id = id`; `local_select_id = id` only if it is in `list`.
fn select_if_local(id_info: &mut IdInfo, id: Option<MessageId>, list: &FilteredMessageList) {
    id_info.final_select_id = id;
    id_info.local_select_id = id.filter(|id| list.contains(*id));
}

fn log_decision(narrow: &Narrow, rule: SelectionRule, id_info: &IdInfo, list: &FilteredMessageList) {
    debug!(
        narrow = %narrow,
        rule = ?rule,
        target_id = ?id_info.target_id,
        local_select_id = ?id_info.local_select_id,
        final_select_id = ?id_info.final_select_id,
        local_messages = list.len(),
        "reconciled narrow"
    );
}
