// src/manager/manager_step.rs

//! Result type for one manager step.

use crate::task::{LaunchRequest, TaskId};

/// What a single [`TaskManager::step`](crate::manager::TaskManager::step)
/// changed in the pool.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ManagerStep {
    /// Instances that moved to `Running`; the caller must launch these jobs.
    pub launched: Vec<LaunchRequest>,
    /// Successor instances created by abdication.
    pub spawned: Vec<TaskId>,
    /// Spent instances deleted by garbage collection.
    pub removed: Vec<TaskId>,
}

impl ManagerStep {
    pub fn is_empty(&self) -> bool {
        self.launched.is_empty() && self.spawned.is_empty() && self.removed.is_empty()
    }
}
