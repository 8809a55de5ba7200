use crate::graph::{Edge, Node, NodeType};
use crate::sync::inconsistent_groups;
use ahash::{AHashMap, AHashSet};
use itertools::Itertools;

mod report;
mod rules;
mod topology;

pub use report::*;
pub use rules::NodeRule;

use rules::register_default_rules;
use topology::Topology;

/// Structural and data validation of a strategy graph.
///
/// The validator is pure: the same snapshot always produces the same result, and every
/// check runs even when an earlier one already failed, so the user sees every problem at
/// once.
pub struct Validator {
    registry: AHashMap<NodeType, Vec<Box<dyn NodeRule>>>,
}

pub struct ValidatorBuilder {
    rules: Vec<Box<dyn NodeRule>>,
}

impl ValidatorBuilder {
    pub fn new() -> Self {
        let mut rules = Vec::new();
        register_default_rules(&mut rules);
        Self { rules }
    }

    /// Drops the built-in node data rules. Structural checks always run.
    pub fn without_default_rules(mut self) -> Self {
        self.rules.clear();
        self
    }

    /// Adds a rule that runs after the rules already registered for its node type.
    pub fn with_rule(mut self, rule: Box<dyn NodeRule>) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn build(self) -> Validator {
        let mut registry: AHashMap<NodeType, Vec<Box<dyn NodeRule>>> = AHashMap::new();
        for rule in self.rules {
            registry.entry(rule.node_type()).or_default().push(rule);
        }
        Validator { registry }
    }
}

impl Default for ValidatorBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl Default for Validator {
    fn default() -> Self {
        ValidatorBuilder::new().build()
    }
}

impl Validator {
    pub fn builder() -> ValidatorBuilder {
        ValidatorBuilder::new()
    }

    pub fn validate(&self, nodes: &[Node], edges: &[Edge]) -> ValidationResult {
        let topology = Topology::new(nodes, edges);
        let mut sink = FindingSink::default();

        check_start(nodes, &mut sink);
        check_disconnected(nodes, &topology, &mut sink);
        check_terminals(nodes, &topology, &mut sink);
        check_paths_to_end(nodes, &topology, &mut sink);
        self.check_node_data(nodes, &mut sink);
        check_edge_invariants(nodes, edges, &topology, &mut sink);
        check_duplicate_ids(nodes, &mut sink);
        check_groups(nodes, &mut sink);

        let result = sink.finish();
        log::debug!(
            "Validated {} nodes / {} edges: {} errors, {} warnings",
            nodes.len(),
            edges.len(),
            result.errors.len(),
            result.warnings.len()
        );
        result
    }

    fn check_node_data(&self, nodes: &[Node], sink: &mut FindingSink) {
        for node in nodes {
            for rule in self.registry.get(&node.node_type).into_iter().flatten() {
                rule.check(node, sink);
            }
        }
    }
}

/// Validates a graph with the built-in rules.
pub fn validate_workflow(nodes: &[Node], edges: &[Edge]) -> ValidationResult {
    Validator::default().validate(nodes, edges)
}

fn check_start(nodes: &[Node], sink: &mut FindingSink) {
    if !nodes.iter().any(|n| n.node_type == NodeType::Start) {
        sink.error(Finding::new(
            FindingKind::MissingStart,
            "Strategy has no start node",
        ));
    }
}

fn check_disconnected(nodes: &[Node], topology: &Topology<'_>, sink: &mut FindingSink) {
    for node in nodes {
        if node.node_type != NodeType::Start && !topology.is_connected(&node.id) {
            sink.warning(Finding::for_node(
                FindingKind::DisconnectedNode,
                &node.id,
                format!("{} node '{}' is not connected", node.node_type, node.id),
            ));
        }
    }
}

fn check_terminals(nodes: &[Node], topology: &Topology<'_>, sink: &mut FindingSink) {
    for node in nodes {
        if !node.node_type.is_end() && topology.out_degree(&node.id) == 0 {
            sink.warning(Finding::for_node(
                FindingKind::InvalidTerminal,
                &node.id,
                format!(
                    "{} node '{}' has no outgoing connection and is not an end node",
                    node.node_type, node.id
                ),
            ));
        }
    }
}

/// Every start node and every connected non-end node must be able to reach an end node.
/// Disconnected nodes are only reported as warnings above, unless the graph has no end
/// node at all, in which case every non-end node fails.
fn check_paths_to_end<'a>(nodes: &'a [Node], topology: &Topology<'a>, sink: &mut FindingSink) {
    let has_end = nodes.iter().any(|n| n.node_type.is_end());
    let reaching = topology.reaching_end();
    let failing: Vec<String> = nodes
        .iter()
        .filter(|n| !n.node_type.is_end())
        .filter(|n| {
            !has_end || n.node_type == NodeType::Start || topology.is_connected(&n.id)
        })
        .filter(|n| !reaching.contains(n.id.as_str()))
        .map(|n| n.id.clone())
        .collect();

    if !failing.is_empty() {
        sink.error(Finding {
            kind: FindingKind::NoPathToEnd,
            message: format!("No path to an end node from: {}", failing.iter().join(", ")),
            node_ids: failing,
        });
    }
}

fn check_edge_invariants(
    nodes: &[Node],
    edges: &[Edge],
    topology: &Topology<'_>,
    sink: &mut FindingSink,
) {
    for node in nodes {
        if node.node_type == NodeType::Start && topology.in_degree(&node.id) > 0 {
            sink.error(Finding::for_node(
                FindingKind::StartHasIncoming,
                &node.id,
                format!("Start node '{}' has incoming connections", node.id),
            ));
        }
        if node.node_type.is_end() && topology.out_degree(&node.id) > 0 {
            sink.error(Finding::for_node(
                FindingKind::EndHasOutgoing,
                &node.id,
                format!("{} node '{}' has outgoing connections", node.node_type, node.id),
            ));
        }
    }
    for edge in edges {
        let missing: Vec<&str> = [edge.source.as_str(), edge.target.as_str()]
            .into_iter()
            .filter(|id| !topology.contains(id))
            .collect();
        if !missing.is_empty() {
            sink.warning(Finding::new(
                FindingKind::DanglingEdge,
                format!(
                    "Edge '{}' references unknown node(s): {}",
                    edge.id,
                    missing.join(", ")
                ),
            ));
        }
    }
}

fn check_duplicate_ids(nodes: &[Node], sink: &mut FindingSink) {
    let mut seen = AHashSet::new();
    let duplicates: Vec<String> = nodes
        .iter()
        .filter(|n| !seen.insert(n.id.as_str()))
        .map(|n| n.id.clone())
        .unique()
        .collect();
    if !duplicates.is_empty() {
        sink.error(Finding {
            kind: FindingKind::DuplicateNodeId,
            message: format!("Node ids used more than once: {}", duplicates.join(", ")),
            node_ids: duplicates,
        });
    }
}

fn check_groups(nodes: &[Node], sink: &mut FindingSink) {
    for group in inconsistent_groups(nodes) {
        sink.warning(Finding {
            kind: FindingKind::InconsistentGroup,
            message: format!(
                "Re-entry group {} has members with different re-entry budgets",
                group.group_number
            ),
            node_ids: group.node_ids,
        });
    }
}
