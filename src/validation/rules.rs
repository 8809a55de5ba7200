use super::report::{Finding, FindingKind, FindingSink};
use crate::graph::{Node, NodeData, NodeType};

/// Defines the contract for checking the data of one node type.
pub trait NodeRule: Send + Sync {
    fn node_type(&self) -> NodeType;
    fn check(&self, node: &Node, sink: &mut FindingSink);
}

fn has_text(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|s| !s.trim().is_empty())
}

/// Defines rules that raise a `missing-data` error when a required field is absent.
macro_rules! define_required_data_rules {
    ( $( ($struct_name:ident, $node_type:path, $what:expr, $present:expr) ),* $(,)? ) => {
        $(
            struct $struct_name;
            impl NodeRule for $struct_name {
                fn node_type(&self) -> NodeType { $node_type }
                fn check(&self, node: &Node, sink: &mut FindingSink) {
                    let present: fn(&NodeData) -> bool = $present;
                    if !present(&node.data) {
                        sink.error(Finding::for_node(
                            FindingKind::MissingData,
                            &node.id,
                            format!("{} node '{}' is missing {}", node.node_type, node.id, $what),
                        ));
                    }
                }
            }
        )*

        fn register_required_data_rules(registry: &mut Vec<Box<dyn NodeRule>>) {
            $( registry.push(Box::new($struct_name)); )*
        }
    };
}

define_required_data_rules! {
    (StartSymbolRule, NodeType::Start, "a symbol", |d| has_text(&d.symbol)),
    (SignalConditionsRule, NodeType::Signal, "conditions", |d| {
        d.conditions.as_ref().is_some_and(|c| !c.is_empty())
    }),
    (EntryActionRule, NodeType::Entry, "an action type", |d| has_text(&d.action_type)),
    (ExitConditionRule, NodeType::Exit, "an exit condition", |d| {
        d.exit_condition.as_ref().is_some_and(|c| !c.is_null())
    }),
}

/// A start node without indicators is allowed but probably unfinished.
struct StartIndicatorsRule;

impl NodeRule for StartIndicatorsRule {
    fn node_type(&self) -> NodeType {
        NodeType::Start
    }

    fn check(&self, node: &Node, sink: &mut FindingSink) {
        if node.data.indicators.as_ref().is_none_or(|i| i.is_empty()) {
            sink.warning(Finding::for_node(
                FindingKind::EmptyIndicators,
                &node.id,
                format!("Start node '{}' has no indicators configured", node.id),
            ));
        }
    }
}

/// Retry nodes must name a positive group number and a positive budget.
struct RetryConfigRule;

impl NodeRule for RetryConfigRule {
    fn node_type(&self) -> NodeType {
        NodeType::Retry
    }

    fn check(&self, node: &Node, sink: &mut FindingSink) {
        match node.data.retry_config {
            Some(c) if c.group_number > 0 && c.max_re_entries > 0 => {}
            Some(_) => sink.error(Finding::for_node(
                FindingKind::InvalidGroupConfig,
                &node.id,
                format!(
                    "Retry node '{}' needs a group number and re-entry budget of at least 1",
                    node.id
                ),
            )),
            None => sink.error(Finding::for_node(
                FindingKind::InvalidGroupConfig,
                &node.id,
                format!("Retry node '{}' has no retry configuration", node.id),
            )),
        }
    }
}

/// Enabled re-entry on an exit node follows the same positivity rule as retry nodes.
struct ExitReEntryRule;

impl NodeRule for ExitReEntryRule {
    fn node_type(&self) -> NodeType {
        NodeType::Exit
    }

    fn check(&self, node: &Node, sink: &mut FindingSink) {
        if let Some(c) = node.data.re_entry_config() {
            if c.enabled && (c.group_number == 0 || c.max_re_entries == 0) {
                sink.error(Finding::for_node(
                    FindingKind::InvalidGroupConfig,
                    &node.id,
                    format!(
                        "Exit node '{}' enables re-entry without a positive group number and budget",
                        node.id
                    ),
                ));
            }
        }
    }
}

/// Registers the built-in rules in the order they report.
pub(super) fn register_default_rules(registry: &mut Vec<Box<dyn NodeRule>>) {
    register_required_data_rules(registry);
    registry.push(Box::new(StartIndicatorsRule));
    registry.push(Box::new(RetryConfigRule));
    registry.push(Box::new(ExitReEntryRule));
}
