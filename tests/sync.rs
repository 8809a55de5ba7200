//! Tests for re-entry group synchronization.
mod common;
use common::*;
use senryaku::error::SyncError;
use senryaku::graph::{ReEntryConfig, RetryConfig};
use senryaku::prelude::*;
use senryaku::sync::{group_membership, inconsistent_groups};
use serde_json::json;

fn retry_config(doc: &GraphDocument, id: &str) -> RetryConfig {
    doc.node(id).and_then(|n| n.data.retry_config).unwrap()
}

fn re_entry(doc: &GraphDocument, id: &str) -> ReEntryConfig {
    doc.node(id).and_then(|n| n.data.re_entry_config().copied()).unwrap()
}

fn set_max(node_id: &str, max_re_entries: u32) -> SyncCommand {
    SyncCommand::SetMaxReEntries {
        node_id: node_id.to_string(),
        max_re_entries,
    }
}

#[test]
fn test_budget_edit_propagates_to_group() {
    let nodes = vec![retry("R1", 1, 2), retry("R2", 1, 2)];
    let plan = Synchronizer::plan(&nodes, &set_max("R1", 5)).unwrap();

    assert_eq!(
        plan,
        vec![
            PatchInstruction::new(
                "R1",
                NodePatch::RetryConfig(RetryConfig {
                    group_number: 1,
                    max_re_entries: 5
                })
            ),
            PatchInstruction::new(
                "R2",
                NodePatch::RetryConfig(RetryConfig {
                    group_number: 1,
                    max_re_entries: 5
                })
            ),
        ]
    );
}

#[test]
fn test_budget_edit_reaches_exit_members_only_when_enabled() {
    let nodes = vec![
        retry("R1", 1, 2),
        exit("X1", 1, 2, true),
        exit("X2", 1, 2, false),
        retry("R3", 2, 2),
    ];
    let plan = Synchronizer::plan(&nodes, &set_max("R1", 4)).unwrap();
    let targets: Vec<&str> = plan.iter().map(|i| i.node_id.as_str()).collect();
    assert_eq!(targets, vec!["R1", "X1"]);
    assert_eq!(
        plan[1].patch,
        NodePatch::ExitNodeData {
            re_entry_config: ReEntryConfig {
                enabled: true,
                group_number: 1,
                max_re_entries: 4
            }
        }
    );
}

#[test]
fn test_joining_a_group_adopts_its_budget() {
    let nodes = vec![retry("R1", 1, 2), retry("R2", 1, 2), retry("R3", 2, 7)];
    let plan = Synchronizer::plan(
        &nodes,
        &SyncCommand::SetGroupNumber {
            node_id: "R3".to_string(),
            group_number: 1,
        },
    )
    .unwrap();
    assert_eq!(
        plan,
        vec![PatchInstruction::new(
            "R3",
            NodePatch::RetryConfig(RetryConfig {
                group_number: 1,
                max_re_entries: 2
            })
        )]
    );

    // An empty group keeps the node's own budget.
    let plan = Synchronizer::plan(
        &nodes,
        &SyncCommand::SetGroupNumber {
            node_id: "R3".to_string(),
            group_number: 9,
        },
    )
    .unwrap();
    assert_eq!(
        plan[0].patch,
        NodePatch::RetryConfig(RetryConfig {
            group_number: 9,
            max_re_entries: 7
        })
    );
}

#[test]
fn test_enabling_re_entry_joins_the_group() {
    let nodes = vec![retry("R1", 3, 6), exit("X1", 3, 1, false)];
    let plan = Synchronizer::plan(
        &nodes,
        &SyncCommand::SetReEntryEnabled {
            node_id: "X1".to_string(),
            enabled: true,
        },
    )
    .unwrap();
    assert_eq!(
        plan,
        vec![PatchInstruction::new(
            "X1",
            NodePatch::ExitNodeData {
                re_entry_config: ReEntryConfig {
                    enabled: true,
                    group_number: 3,
                    max_re_entries: 6
                }
            }
        )]
    );

    // Re-entry is not a retry node setting.
    let plan = Synchronizer::plan(
        &nodes,
        &SyncCommand::SetReEntryEnabled {
            node_id: "R1".to_string(),
            enabled: false,
        },
    )
    .unwrap();
    assert!(plan.is_empty());
}

#[test]
fn test_invalid_commands() {
    let nodes = vec![retry("R1", 1, 2), signal("S")];
    assert_eq!(
        Synchronizer::plan(&nodes, &set_max("nope", 2)),
        Err(SyncError::NodeNotFound("nope".to_string()))
    );
    assert_eq!(
        Synchronizer::plan(&nodes, &set_max("S", 2)),
        Err(SyncError::NotGroupable {
            node_id: "S".to_string(),
            node_type: NodeType::Signal
        })
    );
    assert!(matches!(
        Synchronizer::plan(&nodes, &set_max("R1", 0)),
        Err(SyncError::ZeroValue { field: "maxReEntries", .. })
    ));
    assert!(matches!(
        Synchronizer::plan(
            &nodes,
            &SyncCommand::SetGroupNumber {
                node_id: "R1".to_string(),
                group_number: 0
            }
        ),
        Err(SyncError::ZeroValue { field: "groupNumber", .. })
    ));
}

#[test]
fn test_next_available_group_number() {
    let nodes = vec![retry("R1", 1, 1), retry("R2", 2, 1), exit("X4", 4, 1, true)];
    assert_eq!(next_available_group_number(&nodes), 3);
    assert_eq!(next_available_group_number(&[]), 1);

    // Disabled exits do not reserve their group.
    let nodes = vec![exit("X1", 1, 1, false), retry("R2", 2, 1)];
    assert_eq!(next_available_group_number(&nodes), 1);

    let fresh = Node::new_retry("R3", &[retry("R1", 1, 1), retry("R2", 2, 1)]);
    assert_eq!(fresh.data.retry_config.map(|c| c.group_number), Some(3));
}

#[test]
fn test_find_nodes_in_same_group() {
    let nodes = vec![
        retry("R1", 1, 1),
        exit("X1", 1, 1, true),
        exit("X2", 1, 1, false),
        retry("R2", 2, 1),
    ];
    let ids: Vec<&str> = find_nodes_in_same_group(&nodes, 1, "R1")
        .iter()
        .map(|n| n.id.as_str())
        .collect();
    assert_eq!(ids, vec!["X1"]);
    assert!(group_membership(&nodes[2]).is_none());
    assert!(group_membership(&signal("S")).is_none());
}

#[test]
fn test_queue_converges_group() {
    let doc = GraphDocument::new(
        vec![retry("R1", 1, 2), retry("R2", 1, 2), exit("X1", 1, 2, true)],
        Vec::new(),
    );
    let mut queue = SyncQueue::new(doc);
    let report = queue.submit(set_max("R1", 5)).unwrap();
    assert_eq!(report.applied.len(), 3);
    assert!(report.rejected.is_empty());

    let doc = queue.store();
    assert_eq!(retry_config(doc, "R1").max_re_entries, 5);
    assert_eq!(retry_config(doc, "R2").max_re_entries, 5);
    assert_eq!(re_entry(doc, "X1").max_re_entries, 5);
    assert!(inconsistent_groups(doc.nodes()).is_empty());
}

#[test]
fn test_queue_serializes_conflicting_edits() {
    // R1 and R2 are edited one right after the other. The second edit is planned against
    // the state the first one left, so the group ends on the later value.
    let doc = GraphDocument::new(vec![retry("R1", 1, 2), retry("R2", 1, 2)], Vec::new());
    let mut queue = SyncQueue::new(doc);
    queue.enqueue(set_max("R1", 5));
    queue.enqueue(set_max("R2", 3));
    queue.enqueue(set_max("missing", 3));
    assert_eq!(queue.pending(), 3);

    let report = queue.drain().unwrap();
    assert_eq!(queue.pending(), 0);
    assert_eq!(report.applied.len(), 4);
    assert_eq!(report.rejected.len(), 1);
    assert_eq!(report.rejected[0].1, SyncError::NodeNotFound("missing".to_string()));

    let doc = queue.into_store();
    assert_eq!(retry_config(&doc, "R1").max_re_entries, 3);
    assert_eq!(retry_config(&doc, "R2").max_re_entries, 3);
}

#[test]
fn test_applying_a_plan_twice_changes_nothing() {
    let nodes = vec![retry("R1", 1, 2), exit("X1", 1, 2, true)];
    let plan = Synchronizer::plan(&nodes, &set_max("X1", 8)).unwrap();

    let mut once = GraphDocument::new(nodes.clone(), Vec::new());
    for instruction in &plan {
        once.apply(instruction).unwrap();
    }
    let mut twice = once.clone();
    for instruction in &plan {
        twice.apply(instruction).unwrap();
    }
    assert_eq!(once, twice);

    // Replanning the same edit on the converged state yields the same instructions.
    assert_eq!(Synchronizer::plan(&once.nodes, &set_max("X1", 8)).unwrap(), plan);
}

#[test]
fn test_patch_keeps_other_exit_settings() {
    let mut doc = GraphDocument::from_json(common::STRATEGY_JSON).unwrap();
    let instruction = PatchInstruction::new(
        "exit-1",
        NodePatch::ExitNodeData {
            re_entry_config: ReEntryConfig {
                enabled: true,
                group_number: 1,
                max_re_entries: 9,
            },
        },
    );
    doc.apply(&instruction).unwrap();

    let exit_data = doc.node("exit-1").and_then(|n| n.data.exit_node_data.as_ref()).unwrap();
    assert_eq!(exit_data.extra.get("orderType"), Some(&json!("market")));
    assert_eq!(re_entry(&doc, "exit-1").max_re_entries, 9);

    assert_eq!(
        doc.apply(&PatchInstruction::new(
            "ghost",
            NodePatch::RetryConfig(RetryConfig {
                group_number: 1,
                max_re_entries: 1
            })
        )),
        Err(SyncError::NodeNotFound("ghost".to_string()))
    );
}

#[test]
fn test_patch_instruction_wire_format() {
    let instruction = PatchInstruction::new(
        "R2",
        NodePatch::RetryConfig(RetryConfig {
            group_number: 1,
            max_re_entries: 5,
        }),
    );
    assert_eq!(
        serde_json::to_value(&instruction).unwrap(),
        json!({ "nodeId": "R2", "patch": { "retryConfig": { "groupNumber": 1, "maxReEntries": 5 } } })
    );

    let instruction = PatchInstruction::new(
        "X1",
        NodePatch::ExitNodeData {
            re_entry_config: ReEntryConfig {
                enabled: true,
                group_number: 2,
                max_re_entries: 3,
            },
        },
    );
    assert_eq!(
        serde_json::to_value(&instruction).unwrap(),
        json!({
            "nodeId": "X1",
            "patch": { "exitNodeData": { "reEntryConfig": { "enabled": true, "groupNumber": 2, "maxReEntries": 3 } } }
        })
    );
}

#[test]
fn test_sync_command_wire_format() {
    let command: SyncCommand = serde_json::from_value(json!({
        "command": "setMaxReEntries",
        "nodeId": "R1",
        "maxReEntries": 4
    }))
    .unwrap();
    assert_eq!(command, set_max("R1", 4));
    assert_eq!(command.node_id(), "R1");
}

/// A document store that refuses patches for one node until told otherwise.
struct RefusingStore {
    doc: GraphDocument,
    refuse: Option<String>,
}

impl NodeStore for RefusingStore {
    fn nodes(&self) -> &[Node] {
        &self.doc.nodes
    }

    fn apply(&mut self, instruction: &PatchInstruction) -> std::result::Result<(), SyncError> {
        if self.refuse.as_deref() == Some(instruction.node_id.as_str()) {
            return Err(SyncError::StoreRejected {
                node_id: instruction.node_id.clone(),
                reason: "node is locked".to_string(),
            });
        }
        self.doc.apply(instruction)
    }
}

#[test]
fn test_refused_patch_keeps_command_queued() {
    let store = RefusingStore {
        doc: GraphDocument::new(vec![retry("R1", 1, 2), retry("R2", 1, 2)], Vec::new()),
        refuse: Some("R2".to_string()),
    };
    let mut queue = SyncQueue::new(store);

    let err = queue.submit(set_max("R1", 5)).unwrap_err();
    assert!(matches!(err.source, SyncError::StoreRejected { ref node_id, .. } if node_id == "R2"));
    let applied: Vec<&str> = err.report.applied.iter().map(|i| i.node_id.as_str()).collect();
    assert_eq!(applied, vec!["R1"]);
    assert_eq!(queue.pending(), 1);

    queue.store_mut().refuse = None;
    let report = queue.drain().unwrap();
    assert_eq!(report.applied.len(), 2);
    assert_eq!(queue.pending(), 0);

    let doc = &queue.store().doc;
    assert_eq!(retry_config(doc, "R1").max_re_entries, 5);
    assert_eq!(retry_config(doc, "R2").max_re_entries, 5);
    assert!(inconsistent_groups(doc.nodes()).is_empty());
}
