use crate::graph::{Node, NodeType};
use ahash::AHashSet;
use itertools::Itertools;

/// The re-entry group a node belongs to and the budget it carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupMembership {
    pub group_number: u32,
    pub max_re_entries: u32,
}

/// A group whose members do not agree on their budget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupConflict {
    pub group_number: u32,
    pub node_ids: Vec<String>,
}

/// Group membership of `node`: exit nodes with re-entry enabled, and retry nodes.
pub fn group_membership(node: &Node) -> Option<GroupMembership> {
    match node.node_type {
        NodeType::Exit => node
            .data
            .re_entry_config()
            .filter(|c| c.enabled)
            .map(|c| GroupMembership {
                group_number: c.group_number,
                max_re_entries: c.max_re_entries,
            }),
        NodeType::Retry => node.data.retry_config.map(|c| GroupMembership {
            group_number: c.group_number,
            max_re_entries: c.max_re_entries,
        }),
        _ => None,
    }
}

/// Every node in `group_number` except `exclude_id`, in snapshot order.
pub fn find_nodes_in_same_group<'a>(
    nodes: &'a [Node],
    group_number: u32,
    exclude_id: &str,
) -> Vec<&'a Node> {
    nodes
        .iter()
        .filter(|n| n.id != exclude_id)
        .filter(|n| group_membership(n).is_some_and(|m| m.group_number == group_number))
        .collect()
}

/// The smallest positive group number no exit or retry node is using.
pub fn next_available_group_number(nodes: &[Node]) -> u32 {
    let used: AHashSet<u32> = nodes
        .iter()
        .filter_map(group_membership)
        .map(|m| m.group_number)
        .collect();
    (1..)
        .find(|n| !used.contains(n))
        .unwrap_or(1)
}

/// Groups whose members carry more than one `maxReEntries` value, by group number.
pub fn inconsistent_groups(nodes: &[Node]) -> Vec<GroupConflict> {
    nodes
        .iter()
        .filter_map(|n| group_membership(n).map(|m| (m, n.id.clone())))
        .into_group_map_by(|(m, _)| m.group_number)
        .into_iter()
        .filter(|(_, members)| {
            members
                .iter()
                .map(|(m, _)| m.max_re_entries)
                .all_equal_value()
                .is_err()
        })
        .sorted_by_key(|(group_number, _)| *group_number)
        .map(|(group_number, members)| GroupConflict {
            group_number,
            node_ids: members.into_iter().map(|(_, id)| id).collect(),
        })
        .collect()
}
