use serde::{Deserialize, Serialize};
use std::fmt;

/// What a validation finding is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FindingKind {
    MissingStart,
    DisconnectedNode,
    InvalidTerminal,
    NoPathToEnd,
    MissingData,
    EmptyIndicators,
    DuplicateNodeId,
    DanglingEdge,
    StartHasIncoming,
    EndHasOutgoing,
    InvalidGroupConfig,
    InconsistentGroup,
}

impl FindingKind {
    pub fn code(&self) -> &'static str {
        match self {
            FindingKind::MissingStart => "missing-start",
            FindingKind::DisconnectedNode => "disconnected-node",
            FindingKind::InvalidTerminal => "invalid-terminal",
            FindingKind::NoPathToEnd => "no-path-to-end",
            FindingKind::MissingData => "missing-data",
            FindingKind::EmptyIndicators => "empty-indicators",
            FindingKind::DuplicateNodeId => "duplicate-node-id",
            FindingKind::DanglingEdge => "dangling-edge",
            FindingKind::StartHasIncoming => "start-has-incoming",
            FindingKind::EndHasOutgoing => "end-has-outgoing",
            FindingKind::InvalidGroupConfig => "invalid-group-config",
            FindingKind::InconsistentGroup => "inconsistent-group",
        }
    }
}

impl fmt::Display for FindingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// A single validation finding. Whether it is an error or a warning depends on
/// which list of [`ValidationResult`] it was placed in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Finding {
    pub kind: FindingKind,
    pub message: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub node_ids: Vec<String>,
}

impl Finding {
    pub fn new(kind: FindingKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            node_ids: Vec::new(),
        }
    }

    pub fn for_node(kind: FindingKind, node_id: &str, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            node_ids: vec![node_id.to_string()],
        }
    }
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.kind, self.message)
    }
}

/// Outcome of validating a strategy graph.
///
/// `valid` is false exactly when `errors` is non-empty. Warnings never affect it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub valid: bool,
    pub errors: Vec<Finding>,
    pub warnings: Vec<Finding>,
}

impl ValidationResult {
    pub fn has(&self, kind: FindingKind) -> bool {
        self.errors
            .iter()
            .chain(&self.warnings)
            .any(|f| f.kind == kind)
    }

    /// Every finding of `kind`, errors first.
    pub fn findings(&self, kind: FindingKind) -> Vec<&Finding> {
        self.errors
            .iter()
            .chain(&self.warnings)
            .filter(|f| f.kind == kind)
            .collect()
    }
}

/// Collects findings while the checks run.
#[derive(Debug, Default)]
pub struct FindingSink {
    errors: Vec<Finding>,
    warnings: Vec<Finding>,
}

impl FindingSink {
    pub fn error(&mut self, finding: Finding) {
        self.errors.push(finding);
    }

    pub fn warning(&mut self, finding: Finding) {
        self.warnings.push(finding);
    }

    pub fn finish(self) -> ValidationResult {
        ValidationResult {
            valid: self.errors.is_empty(),
            errors: self.errors,
            warnings: self.warnings,
        }
    }
}
