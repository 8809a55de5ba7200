use super::store::NodeStore;
use super::synchronizer::{SyncCommand, Synchronizer};
use crate::error::{DrainError, SyncError};
use crate::graph::PatchInstruction;
use std::collections::VecDeque;

/// Single-writer queue that serializes group edits against a node store.
///
/// Each command is planned against the store's snapshot as it is after every earlier
/// command has been applied, so no plan is ever computed from stale data and two group
/// members can never overwrite each other's budget.
pub struct SyncQueue<S: NodeStore> {
    store: S,
    pending: VecDeque<SyncCommand>,
}

/// What a drain applied.
#[derive(Debug, Default)]
pub struct DrainReport {
    pub applied: Vec<PatchInstruction>,
    /// Commands that could not be planned, with the reason. They are dropped.
    pub rejected: Vec<(SyncCommand, SyncError)>,
}

impl<S: NodeStore> SyncQueue<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            pending: VecDeque::new(),
        }
    }

    pub fn enqueue(&mut self, command: SyncCommand) {
        self.pending.push_back(command);
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Mutable access for host-side changes between drains. Queued commands are planned
    /// against whatever the store holds when they are drained.
    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Plans and applies every queued command in order.
    ///
    /// A command that cannot be planned is reported and skipped. Every node a plan
    /// touches is checked before any of its instructions is applied. If the store still
    /// refuses one, the drain stops with the partial report, and the command goes back
    /// to the front of the queue. Instructions are idempotent, so draining again once
    /// the store accepts it finishes the group.
    pub fn drain(&mut self) -> Result<DrainReport, DrainError> {
        let mut report = DrainReport::default();
        while let Some(command) = self.pending.pop_front() {
            let plan = match Synchronizer::plan(self.store.nodes(), &command) {
                Ok(plan) => plan,
                Err(e) => {
                    log::warn!("Rejected {:?}: {}", command, e);
                    report.rejected.push((command, e));
                    continue;
                }
            };
            if let Some(missing) = plan
                .iter()
                .find(|i| self.store.node_data(&i.node_id).is_none())
            {
                let source = SyncError::NodeNotFound(missing.node_id.clone());
                log::warn!("Store has no node '{}', keeping {:?} queued", missing.node_id, command);
                self.pending.push_front(command);
                return Err(DrainError { report, source });
            }
            for instruction in plan {
                if let Err(source) = self.store.apply(&instruction) {
                    log::warn!(
                        "Store refused instruction for '{}', keeping {:?} queued: {}",
                        instruction.node_id,
                        command,
                        source
                    );
                    self.pending.push_front(command);
                    return Err(DrainError { report, source });
                }
                report.applied.push(instruction);
            }
        }
        log::info!(
            "Sync queue drained: {} instruction(s) applied, {} command(s) rejected",
            report.applied.len(),
            report.rejected.len()
        );
        Ok(report)
    }

    /// Enqueues one command and drains the queue.
    pub fn submit(&mut self, command: SyncCommand) -> Result<DrainReport, DrainError> {
        self.enqueue(command);
        self.drain()
    }
}
