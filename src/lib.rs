//! # Senryaku - Strategy Graph Core
//!
//! **Senryaku** is the core of a visual trading-strategy editor. A strategy is a directed
//! graph of typed nodes (start, signal, entry/exit/alert actions, retry, end), and signal
//! nodes carry a small boolean condition language evaluated against market, indicator and
//! position data.
//!
//! The crate holds no state of its own. The hosting editor passes in snapshots of its
//! nodes and edges and gets back validation results, formatted strings, or patch
//! instructions to apply to its own node store.
//!
//! ## Core Pieces
//!
//! 1.  **Expressions and conditions** ([`expression`], [`condition`]): the typed
//!     expression language, AND/OR condition groups, and the default values a fresh
//!     operand, condition or group starts with.
//! 2.  **Formatting** ([`format`]): renders conditions as readable text. It never fails;
//!     half-edited input renders as placeholders.
//! 3.  **Validation** ([`validation`]): checks that the graph has a start node, that every
//!     node can reach an end node, and that every node carries the data its type needs.
//! 4.  **Re-entry groups** ([`sync`]): keeps `maxReEntries` identical across every exit
//!     and retry node sharing a group number.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use senryaku::prelude::*;
//!
//! fn main() -> Result<()> {
//!     // 1. Load the document the editor saved.
//!     let doc = GraphDocument::from_file("strategy.json")?;
//!
//!     // 2. Validate its structure and node data.
//!     let result = validate_workflow(&doc.nodes, &doc.edges);
//!     for error in &result.errors {
//!         println!("error: {}", error);
//!     }
//!
//!     // 3. Render every signal node's conditions.
//!     let ctx = doc.format_context();
//!     for node in doc.nodes.iter().filter(|n| n.node_type == NodeType::Signal) {
//!         let groups = node.data.conditions.as_deref().unwrap_or_default();
//!         println!("{}: {}", node.id, ConditionFormatter::format_conditions(groups, &ctx));
//!     }
//!
//!     // 4. Change a retry node's budget and keep its group in step.
//!     let mut queue = SyncQueue::new(doc);
//!     queue.submit(SyncCommand::SetMaxReEntries {
//!         node_id: "retry-1".to_string(),
//!         max_re_entries: 3,
//!     })?;
//!     queue.into_store().save("strategy.json")?;
//!
//!     Ok(())
//! }
//! ```

pub mod condition;
pub mod error;
pub mod expression;
pub mod format;
pub mod graph;
pub mod prelude;
pub mod sync;
pub mod validation;
