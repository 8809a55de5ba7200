use crate::graph::NodeType;
use crate::sync::DrainReport;
use thiserror::Error;

/// Errors raised while loading or saving a graph document.
#[derive(Error, Debug)]
pub enum DocumentError {
    #[error("Failed to parse graph document JSON: {0}")]
    JsonParseError(#[from] serde_json::Error),

    #[error("Could not access graph document '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Errors raised when a re-entry group edit cannot be planned or applied.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SyncError {
    #[error("Node '{0}' not found in the graph snapshot")]
    NodeNotFound(String),

    #[error("Node '{node_id}' of type '{node_type}' cannot belong to a re-entry group")]
    NotGroupable { node_id: String, node_type: NodeType },

    #[error("Node '{node_id}': {field} must be a positive integer")]
    ZeroValue {
        node_id: String,
        field: &'static str,
    },

    #[error("Node store refused the patch for '{node_id}': {reason}")]
    StoreRejected { node_id: String, reason: String },
}

/// A drain stopped because the node store refused an instruction.
///
/// `report` holds what was applied before the failure; the failed command is back at
/// the front of the queue.
#[derive(Error, Debug)]
#[error("Sync queue stopped: {source}")]
pub struct DrainError {
    pub report: DrainReport,
    #[source]
    pub source: SyncError,
}

/// Errors raised when the host asks whether two nodes may be connected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConnectionError {
    #[error("Start node '{0}' cannot have incoming connections")]
    IntoStart(String),

    #[error("Terminal node '{0}' cannot have outgoing connections")]
    OutOfEnd(String),

    #[error("Node '{0}' cannot connect to itself")]
    SelfLoop(String),
}
