use crate::error::SyncError;
use crate::graph::{GraphDocument, Node, NodeData, PatchInstruction};

/// The host's node repository, passed explicitly to whatever needs to read or patch nodes.
pub trait NodeStore {
    /// The current snapshot of every node.
    fn nodes(&self) -> &[Node];

    /// Applies one instruction. Must be idempotent.
    fn apply(&mut self, instruction: &PatchInstruction) -> Result<(), SyncError>;

    fn node_data(&self, id: &str) -> Option<&NodeData> {
        self.nodes().iter().find(|n| n.id == id).map(|n| &n.data)
    }
}

impl NodeStore for GraphDocument {
    fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    fn apply(&mut self, instruction: &PatchInstruction) -> Result<(), SyncError> {
        let node = self
            .node_mut(&instruction.node_id)
            .ok_or_else(|| SyncError::NodeNotFound(instruction.node_id.clone()))?;
        node.data.apply_patch(&instruction.patch);
        Ok(())
    }
}
