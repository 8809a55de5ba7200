use super::document::*;
use crate::condition::empty_group_condition;
use crate::error::ConnectionError;
use crate::sync::next_available_group_number;
use serde_json::{Map, Value};

impl NodeData {
    /// Default data for a freshly added node of `node_type`.
    ///
    /// Retry nodes get `group 1, budget 1`; use [`Node::new_retry`] to pick a group that
    /// is not already in use.
    pub fn default_for(node_type: NodeType) -> Self {
        let mut data = NodeData {
            label: Some(default_label(node_type).to_string()),
            ..NodeData::default()
        };
        match node_type {
            NodeType::Start => {
                data.symbol = Some(String::new());
                data.timeframe = Some("1h".to_string());
                data.indicators = Some(Vec::new());
                data.indicator_parameters = Some(Map::new());
            }
            NodeType::Signal => data.conditions = Some(vec![empty_group_condition()]),
            NodeType::Entry => data.action_type = Some("buy".to_string()),
            NodeType::Exit => {
                data.exit_condition = Some(Value::String("all".to_string()));
                data.exit_node_data = Some(ExitNodeData {
                    re_entry_config: Some(ReEntryConfig {
                        enabled: false,
                        group_number: 1,
                        max_re_entries: 1,
                    }),
                    extra: Map::new(),
                });
            }
            NodeType::Alert => {
                data.extra
                    .insert("message".to_string(), Value::String(String::new()));
            }
            NodeType::Retry => {
                data.retry_config = Some(RetryConfig {
                    group_number: 1,
                    max_re_entries: 1,
                })
            }
            NodeType::Modify | NodeType::End | NodeType::ForceEnd => {}
        }
        data
    }
}

fn default_label(node_type: NodeType) -> &'static str {
    match node_type {
        NodeType::Start => "Start",
        NodeType::Signal => "Signal",
        NodeType::Entry => "Entry",
        NodeType::Exit => "Exit",
        NodeType::Alert => "Alert",
        NodeType::Modify => "Modify",
        NodeType::Retry => "Re-entry",
        NodeType::End => "End",
        NodeType::ForceEnd => "Force End",
    }
}

impl Node {
    /// A node of `node_type` with default data.
    pub fn new(id: impl Into<String>, node_type: NodeType) -> Self {
        Self {
            id: id.into(),
            node_type,
            data: NodeData::default_for(node_type),
            extra: Map::new(),
        }
    }

    /// A retry node placed in a group no existing node uses.
    pub fn new_retry(id: impl Into<String>, existing: &[Node]) -> Self {
        let mut node = Node::new(id, NodeType::Retry);
        node.data.retry_config = Some(RetryConfig {
            group_number: next_available_group_number(existing),
            max_re_entries: 1,
        });
        node
    }
}

/// Checks the connection rules the editor enforces when the user draws an edge.
pub fn can_connect(source: &Node, target: &Node) -> Result<(), ConnectionError> {
    if source.id == target.id {
        return Err(ConnectionError::SelfLoop(source.id.clone()));
    }
    if source.node_type.is_end() {
        return Err(ConnectionError::OutOfEnd(source.id.clone()));
    }
    if target.node_type == NodeType::Start {
        return Err(ConnectionError::IntoStart(target.id.clone()));
    }
    Ok(())
}
