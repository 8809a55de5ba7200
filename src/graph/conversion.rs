use super::document::GraphDocument;
use crate::error::DocumentError;

/// A trait for host-side graph models that can be converted into a [`GraphDocument`].
///
/// Hosts that keep nodes in their own store (with view state, selection, and so on)
/// implement this once and hand the result to the validator and the synchronizer.
///
/// # Example
///
/// ```rust,no_run
/// use senryaku::error::DocumentError;
/// use senryaku::graph::{Edge, GraphDocument, IntoGraph, Node, NodeType};
///
/// struct CanvasNode { key: String, kind: NodeType }
/// struct Canvas { nodes: Vec<CanvasNode>, links: Vec<(String, String)> }
///
/// impl IntoGraph for Canvas {
///     fn into_graph(self) -> Result<GraphDocument, DocumentError> {
///         let nodes = self.nodes.into_iter().map(|n| Node::new(n.key, n.kind)).collect();
///         let edges = self
///             .links
///             .into_iter()
///             .enumerate()
///             .map(|(i, (s, t))| Edge::new(format!("e{}", i), s, t))
///             .collect();
///         Ok(GraphDocument::new(nodes, edges))
///     }
/// }
/// ```
pub trait IntoGraph {
    /// Consumes the host model and converts it into a graph document.
    fn into_graph(self) -> Result<GraphDocument, DocumentError>;
}

impl IntoGraph for GraphDocument {
    fn into_graph(self) -> Result<GraphDocument, DocumentError> {
        Ok(self)
    }
}

impl IntoGraph for serde_json::Value {
    fn into_graph(self) -> Result<GraphDocument, DocumentError> {
        Ok(serde_json::from_value(self)?)
    }
}
