use crate::condition::GroupCondition;
use crate::condition::model::lenient_groups;
use crate::error::DocumentError;
use crate::format::FormatContext;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::fs;

/// The kinds of node a strategy graph can contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NodeType {
    Start,
    Signal,
    Entry,
    Exit,
    Alert,
    Modify,
    Retry,
    End,
    ForceEnd,
}

impl NodeType {
    /// Only `end` and `forceEnd` nodes may legitimately terminate a path.
    pub fn is_end(&self) -> bool {
        matches!(self, NodeType::End | NodeType::ForceEnd)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            NodeType::Start => "start",
            NodeType::Signal => "signal",
            NodeType::Entry => "entry",
            NodeType::Exit => "exit",
            NodeType::Alert => "alert",
            NodeType::Modify => "modify",
            NodeType::Retry => "retry",
            NodeType::End => "end",
            NodeType::ForceEnd => "forceEnd",
        }
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Retry settings carried directly by a `retry` node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RetryConfig {
    #[serde(default)]
    pub group_number: u32,
    #[serde(default)]
    pub max_re_entries: u32,
}

/// Re-entry settings nested in an `exit` node's post-execution data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReEntryConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub group_number: u32,
    #[serde(default)]
    pub max_re_entries: u32,
}

/// Post-execution settings of an exit node.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExitNodeData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub re_entry_config: Option<ReEntryConfig>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// The data bag of a node.
///
/// Only the fields the core reads are typed. Everything else the host stores is kept in
/// `extra` and written back unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeframe: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub indicators: Option<Vec<Value>>,
    /// Indicator name -> parameter name -> value, in the order the user entered them.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub indicator_parameters: Option<Map<String, Value>>,
    #[serde(
        default,
        deserialize_with = "lenient_groups",
        skip_serializing_if = "Option::is_none"
    )]
    pub conditions: Option<Vec<GroupCondition>>,
    #[serde(
        default,
        deserialize_with = "lenient_groups",
        skip_serializing_if = "Option::is_none"
    )]
    pub exit_conditions: Option<Vec<GroupCondition>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exit_condition: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retry_config: Option<RetryConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exit_node_data: Option<ExitNodeData>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl NodeData {
    /// The re-entry settings of an exit node, if any.
    pub fn re_entry_config(&self) -> Option<&ReEntryConfig> {
        self.exit_node_data
            .as_ref()
            .and_then(|d| d.re_entry_config.as_ref())
    }
}

/// A graph vertex as the host stores it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: String,
    #[serde(rename = "type")]
    pub node_type: NodeType,
    #[serde(default)]
    pub data: NodeData,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A directed connection between two nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub id: String,
    pub source: String,
    pub target: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Edge {
    pub fn new(id: impl Into<String>, source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
            target: target.into(),
            extra: Map::new(),
        }
    }
}

/// The saved form of a strategy: every node and every edge.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphDocument {
    #[serde(default)]
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub edges: Vec<Edge>,
}

impl GraphDocument {
    pub fn new(nodes: Vec<Node>, edges: Vec<Edge>) -> Self {
        Self { nodes, edges }
    }

    pub fn from_json(json: &str) -> Result<Self, DocumentError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a graph document from a JSON file.
    pub fn from_file(path: &str) -> Result<Self, DocumentError> {
        let content = fs::read_to_string(path).map_err(|source| DocumentError::Io {
            path: path.to_string(),
            source,
        })?;
        Self::from_json(&content)
    }

    pub fn to_json_pretty(&self) -> Result<String, DocumentError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Save the document as pretty-printed JSON.
    pub fn save(&self, path: &str) -> Result<(), DocumentError> {
        let json = self.to_json_pretty()?;
        fs::write(path, json).map_err(|source| DocumentError::Io {
            path: path.to_string(),
            source,
        })
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn node_mut(&mut self, id: &str) -> Option<&mut Node> {
        self.nodes.iter_mut().find(|n| n.id == id)
    }

    /// Formatting context taken from the first start node, which owns the instrument.
    pub fn format_context(&self) -> FormatContext {
        self.nodes
            .iter()
            .find(|n| n.node_type == NodeType::Start)
            .map(|n| FormatContext::from_node_data(&n.data))
            .unwrap_or_default()
    }
}
