use super::group::{find_nodes_in_same_group, group_membership};
use crate::error::SyncError;
use crate::graph::{Node, NodePatch, NodeType, PatchInstruction, ReEntryConfig, RetryConfig};
use serde::{Deserialize, Serialize};

/// A user edit that may affect other members of a re-entry group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum SyncCommand {
    /// Change a node's budget; every other member of its group follows.
    SetMaxReEntries { node_id: String, max_re_entries: u32 },
    /// Move a node to another group; it adopts that group's existing budget.
    SetGroupNumber { node_id: String, group_number: u32 },
    /// Turn re-entry on or off for an exit node. Turning it on joins the node's group.
    SetReEntryEnabled { node_id: String, enabled: bool },
}

impl SyncCommand {
    pub fn node_id(&self) -> &str {
        match self {
            SyncCommand::SetMaxReEntries { node_id, .. }
            | SyncCommand::SetGroupNumber { node_id, .. }
            | SyncCommand::SetReEntryEnabled { node_id, .. } => node_id,
        }
    }
}

/// The group settings of one node, in whichever shape its type stores them.
#[derive(Debug, Clone, Copy)]
enum Settings {
    Retry(RetryConfig),
    Exit(ReEntryConfig),
}

impl Settings {
    fn of(node: &Node) -> Result<Self, SyncError> {
        match node.node_type {
            NodeType::Retry => Ok(Settings::Retry(node.data.retry_config.unwrap_or(
                RetryConfig {
                    group_number: 1,
                    max_re_entries: 1,
                },
            ))),
            NodeType::Exit => Ok(Settings::Exit(
                node.data
                    .re_entry_config()
                    .copied()
                    .unwrap_or(ReEntryConfig {
                        enabled: false,
                        group_number: 1,
                        max_re_entries: 1,
                    }),
            )),
            other => Err(SyncError::NotGroupable {
                node_id: node.id.clone(),
                node_type: other,
            }),
        }
    }

    fn group_number(&self) -> u32 {
        match self {
            Settings::Retry(c) => c.group_number,
            Settings::Exit(c) => c.group_number,
        }
    }

    /// Retry nodes always count as members of their group.
    fn is_member(&self) -> bool {
        match self {
            Settings::Retry(_) => true,
            Settings::Exit(c) => c.enabled,
        }
    }

    fn with_max(mut self, max_re_entries: u32) -> Self {
        match &mut self {
            Settings::Retry(c) => c.max_re_entries = max_re_entries,
            Settings::Exit(c) => c.max_re_entries = max_re_entries,
        }
        self
    }

    fn with_group(mut self, group_number: u32) -> Self {
        match &mut self {
            Settings::Retry(c) => c.group_number = group_number,
            Settings::Exit(c) => c.group_number = group_number,
        }
        self
    }

    fn into_patch(self) -> NodePatch {
        match self {
            Settings::Retry(c) => NodePatch::RetryConfig(c),
            Settings::Exit(c) => NodePatch::ExitNodeData { re_entry_config: c },
        }
    }
}

/// Computes the patches that keep every re-entry group on a single budget.
///
/// Planning never mutates anything. The host applies the returned instructions, then
/// passes the updated snapshot to the next call (see [`super::SyncQueue`]).
pub struct Synchronizer;

impl Synchronizer {
    /// Plans the instructions for one command against a snapshot.
    ///
    /// The edited node's instruction comes first, followed by the other group members in
    /// snapshot order.
    pub fn plan(nodes: &[Node], command: &SyncCommand) -> Result<Vec<PatchInstruction>, SyncError> {
        let node = nodes
            .iter()
            .find(|n| n.id == command.node_id())
            .ok_or_else(|| SyncError::NodeNotFound(command.node_id().to_string()))?;
        let current = Settings::of(node)?;

        let plan = match command {
            SyncCommand::SetMaxReEntries { max_re_entries, .. } => {
                require_positive(node, "maxReEntries", *max_re_entries)?;
                Self::plan_budget_change(nodes, node, current, *max_re_entries)
            }
            SyncCommand::SetGroupNumber { group_number, .. } => {
                require_positive(node, "groupNumber", *group_number)?;
                let moved = current.with_group(*group_number);
                vec![PatchInstruction::new(
                    &node.id,
                    Self::adopt_group_budget(nodes, node, moved).into_patch(),
                )]
            }
            SyncCommand::SetReEntryEnabled { enabled, .. } => match current {
                Settings::Retry(_) => Vec::new(),
                Settings::Exit(config) => {
                    let toggled = Settings::Exit(ReEntryConfig {
                        enabled: *enabled,
                        ..config
                    });
                    vec![PatchInstruction::new(
                        &node.id,
                        Self::adopt_group_budget(nodes, node, toggled).into_patch(),
                    )]
                }
            },
        };

        log::debug!(
            "Planned {} instruction(s) for {:?}",
            plan.len(),
            command
        );
        Ok(plan)
    }

    /// Sets the new budget on the edited node and pushes it to every other member.
    fn plan_budget_change(
        nodes: &[Node],
        node: &Node,
        current: Settings,
        max_re_entries: u32,
    ) -> Vec<PatchInstruction> {
        let mut plan = vec![PatchInstruction::new(
            &node.id,
            current.with_max(max_re_entries).into_patch(),
        )];
        if !current.is_member() {
            return plan;
        }
        for member in find_nodes_in_same_group(nodes, current.group_number(), &node.id) {
            // Members come from group_membership, so their settings always load.
            if let Ok(settings) = Settings::of(member) {
                plan.push(PatchInstruction::new(
                    &member.id,
                    settings.with_max(max_re_entries).into_patch(),
                ));
            }
        }
        plan
    }

    /// A node entering a group takes the budget the group already agrees on.
    fn adopt_group_budget(nodes: &[Node], node: &Node, settings: Settings) -> Settings {
        if !settings.is_member() {
            return settings;
        }
        find_nodes_in_same_group(nodes, settings.group_number(), &node.id)
            .first()
            .and_then(|existing| group_membership(existing))
            .map_or(settings, |m| settings.with_max(m.max_re_entries))
    }
}

fn require_positive(node: &Node, field: &'static str, value: u32) -> Result<(), SyncError> {
    if value == 0 {
        return Err(SyncError::ZeroValue {
            node_id: node.id.clone(),
            field,
        });
    }
    Ok(())
}
