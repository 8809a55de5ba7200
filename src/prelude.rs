//! Prelude module for convenient imports
//!
//! This module re-exports the most commonly used types and functions from the senryaku
//! crate. Import it to get the core functionality without importing each item
//! individually.
//!
//! # Example
//!
//! ```rust,no_run
//! use senryaku::prelude::*;
//!
//! # fn run_example() -> Result<()> {
//! let doc = GraphDocument::from_file("path/to/strategy.json")?;
//! let result = validate_workflow(&doc.nodes, &doc.edges);
//! println!("valid: {}", result.valid);
//! # Ok(())
//! # }
//! ```

// Expression and condition model
pub use crate::condition::{
    ComparisonOperator, Condition, ConditionItem, GroupCondition, GroupLogic,
    empty_condition, empty_group_condition, is_condition, is_group_condition,
};
pub use crate::expression::{ArithmeticOp, Expression, ExpressionType, default_expression};

// Formatting
pub use crate::format::{
    ConditionFormatter, FormatContext, condition_to_string, expression_to_string,
    group_condition_to_string,
};

// Graph documents
pub use crate::graph::{
    Edge, GraphDocument, IntoGraph, Node, NodeData, NodePatch, NodeType, PatchInstruction,
};

// Validation
pub use crate::validation::{Finding, FindingKind, ValidationResult, Validator, validate_workflow};

// Re-entry groups
pub use crate::sync::{
    NodeStore, SyncCommand, SyncQueue, Synchronizer, find_nodes_in_same_group,
    next_available_group_number,
};

// Error types
pub use crate::error::{ConnectionError, DocumentError, DrainError, SyncError};

// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;
