use super::document::{ExitNodeData, NodeData, ReEntryConfig, RetryConfig};
use serde::{Deserialize, Serialize};

/// A partial update to a node's data.
///
/// Serializes to the JSON fragment the host merges into the node, e.g.
/// `{"retryConfig": {...}}` or `{"exitNodeData": {"reEntryConfig": {...}}}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NodePatch {
    RetryConfig(RetryConfig),
    #[serde(rename_all = "camelCase")]
    ExitNodeData { re_entry_config: ReEntryConfig },
}

/// "Set this patch on that node". Applying the same instruction twice changes nothing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatchInstruction {
    pub node_id: String,
    pub patch: NodePatch,
}

impl PatchInstruction {
    pub fn new(node_id: impl Into<String>, patch: NodePatch) -> Self {
        Self {
            node_id: node_id.into(),
            patch,
        }
    }
}

impl NodeData {
    /// Merges a patch into this data, leaving every other field as it was.
    pub fn apply_patch(&mut self, patch: &NodePatch) {
        match patch {
            NodePatch::RetryConfig(config) => self.retry_config = Some(*config),
            NodePatch::ExitNodeData { re_entry_config } => {
                self.exit_node_data
                    .get_or_insert_with(ExitNodeData::default)
                    .re_entry_config = Some(*re_entry_config);
            }
        }
    }
}
