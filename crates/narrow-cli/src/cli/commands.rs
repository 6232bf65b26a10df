use std::sync::Arc;

use anyhow::{Context, Result};
use narrow_core::{reconcile, resolve_target_id, CoreConfig, Narrow, UnreadOracle};

use super::config::{Snapshot, SNAPSHOT_ENV_VAR};
use super::protocol::{CliCommand, ParseOutput, ReconcileOutput, UnreadOutput};

/// Run a command and return its JSON output
pub fn run_command(command: &CliCommand, snapshot: Option<&Snapshot>) -> Result<serde_json::Value> {
    let config = snapshot.map(Snapshot::core_config).unwrap_or_default();

    let output = match command {
        CliCommand::Parse { narrow } => {
            let parsed = parse_narrow(narrow, config)?;
            serde_json::to_value(ParseOutput {
                narrow: parsed.to_string(),
                terms: parsed.terms().to_vec(),
                is_anchored_near: parsed.is_anchored_near(),
                unread_computable_locally: parsed.unread_computable_locally(),
                excludes_muted_topics: parsed.excludes_muted_topics(),
            })?
        }
        CliCommand::Reconcile { narrow, target_id } => {
            let snapshot = require_snapshot(snapshot)?;
            let parsed = parse_narrow(narrow, config)?;
            let store = snapshot.message_store();
            let unread = snapshot.unread_store();

            let target_id = resolve_target_id(&parsed, *target_id);
            let (id_info, list) = reconcile(&parsed, target_id, &store, &unread);
            tracing::info!(
                narrow = %parsed,
                local_messages = list.len(),
                "reconciled narrow against snapshot"
            );

            serde_json::to_value(ReconcileOutput {
                narrow: parsed.to_string(),
                id_info,
                fetch_anchor: id_info.fetch_anchor().to_string(),
                needs_fetch: id_info.needs_fetch(),
                message_ids: list.ids(),
            })?
        }
        CliCommand::Unread { narrow } => {
            let snapshot = require_snapshot(snapshot)?;
            let parsed = parse_narrow(narrow, config)?;
            let unread = snapshot.unread_store();

            serde_json::to_value(UnreadOutput {
                narrow: parsed.to_string(),
                first_unread: unread.first_unread(&parsed),
                unread_count: unread.unread_count(&parsed),
            })?
        }
    };

    Ok(output)
}

fn parse_narrow(input: &str, config: Arc<CoreConfig>) -> Result<Narrow> {
    Narrow::parse(input, config).with_context(|| format!("Invalid narrow: {input}"))
}

fn require_snapshot(snapshot: Option<&Snapshot>) -> Result<&Snapshot> {
    snapshot.with_context(|| {
        format!("This command needs a snapshot (--snapshot or {SNAPSHOT_ENV_VAR})")
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use narrow_core::constants::LARGER_THAN_MAX_MESSAGE_ID;
    use serde_json::json;

    fn snapshot() -> Snapshot {
        Snapshot::from_json(
            r#"{
                "currentUserId": 1,
                "hasFoundNewest": true,
                "messages": [
                    {"id": 37, "senderId": 2, "recipient": {"type": "stream", "stream": "one", "topic": "a"}, "flags": {"read": true}},
                    {"id": 42, "senderId": 2, "recipient": {"type": "stream", "stream": "one", "topic": "a"}, "flags": {"read": true}},
                    {"id": 44, "senderId": 1, "recipient": {"type": "private", "userIds": [1, 2]}, "flags": {"read": true}}
                ],
                "unreadMessages": [
                    {"id": 50, "senderId": 2, "recipient": {"type": "stream", "stream": "one", "topic": "b"}}
                ]
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_parse_without_snapshot() {
        let command = CliCommand::Parse {
            narrow: "channel:one near:42".into(),
        };
        let output = run_command(&command, None).unwrap();
        assert_eq!(output["narrow"], "stream:one near:42");
        assert_eq!(output["isAnchoredNear"], true);
        assert_eq!(output["unreadComputableLocally"], true);
        assert_eq!(output["terms"][1], json!({"operator": "near", "operand": 42, "negated": false}));
    }

    #[test]
    fn test_parse_reports_invalid_narrow() {
        let command = CliCommand::Parse {
            narrow: "near:soon".into(),
        };
        let err = run_command(&command, None).unwrap_err();
        assert!(err.to_string().contains("Invalid narrow"));
    }

    #[test]
    fn test_reconcile_requires_snapshot() {
        let command = CliCommand::Reconcile {
            narrow: "stream:one".into(),
            target_id: None,
        };
        assert!(command.needs_snapshot());
        assert!(run_command(&command, None).is_err());
    }

    #[test]
    fn test_reconcile_near_uses_operand_as_target() {
        let command = CliCommand::Reconcile {
            narrow: "near:42".into(),
            target_id: None,
        };
        let output = run_command(&command, Some(&snapshot())).unwrap();
        assert_eq!(
            output["idInfo"],
            json!({"targetId": 42, "localSelectId": 42, "finalSelectId": 42})
        );
        assert_eq!(output["needsFetch"], false);
        assert_eq!(output["messageIds"], json!([37, 42, 44]));
    }

    #[test]
    fn test_reconcile_unread_outside_cache() {
        let command = CliCommand::Reconcile {
            narrow: "stream:one".into(),
            target_id: None,
        };
        let output = run_command(&command, Some(&snapshot())).unwrap();
        assert_eq!(output["idInfo"]["finalSelectId"], 50);
        assert_eq!(output["idInfo"]["localSelectId"], serde_json::Value::Null);
        assert_eq!(output["fetchAnchor"], "50");
        assert_eq!(output["needsFetch"], true);
        assert_eq!(output["messageIds"], json!([37, 42]));
    }

    #[test]
    fn test_reconcile_search_assumes_newest() {
        let command = CliCommand::Reconcile {
            narrow: "stream:one lunch".into(),
            target_id: None,
        };
        let output = run_command(&command, Some(&snapshot())).unwrap();
        assert_eq!(output["idInfo"]["finalSelectId"], LARGER_THAN_MAX_MESSAGE_ID);
        assert_eq!(output["fetchAnchor"], "newest");
        assert_eq!(output["messageIds"], json!([]));
    }

    #[test]
    fn test_unread_command() {
        let command = CliCommand::Unread {
            narrow: "is:dm".into(),
        };
        let output = run_command(&command, Some(&snapshot())).unwrap();
        assert_eq!(output["firstUnread"], json!({"flavor": "not_found"}));
        assert_eq!(output["unreadCount"], 0);

        let command = CliCommand::Unread {
            narrow: "stream:one".into(),
        };
        let output = run_command(&command, Some(&snapshot())).unwrap();
        assert_eq!(output["firstUnread"], json!({"flavor": "found", "msgId": 50}));
        assert_eq!(output["unreadCount"], 1);
    }
}
