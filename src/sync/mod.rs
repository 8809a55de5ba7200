//! Re-entry group synchronization.
//!
//! Exit nodes with re-entry enabled and retry nodes that share a `groupNumber` share one
//! `maxReEntries` budget. A node joining a group adopts the group's budget; editing the
//! budget of a member pushes the new value to every other member.

mod group;
mod queue;
mod store;
mod synchronizer;

pub use group::*;
pub use queue::*;
pub use store::*;
pub use synchronizer::*;
