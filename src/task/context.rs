// src/task/context.rs

//! State shared across instances: per-kind registry and change tracking.
//!
//! Both are owned by the manager and passed into every mutating task
//! operation, so there are no hidden class-level or process-wide variables.
//! Access is expected to be serialised by the owner (one scheduler loop).

use std::collections::HashMap;

use crate::cycle::CycleTime;
use crate::task::state::TaskId;

/// Everything one kind's instances share.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KindState {
    /// Live instances of this kind.
    pub instance_count: usize,
    pub last_abdicated: Option<CycleTime>,
    pub last_finished: Option<CycleTime>,
    /// Catch-up flag; only ever `Some` for contact kinds.
    pub catching_up: Option<bool>,
}

/// Per-kind shared state keyed by kind name.
#[derive(Debug, Clone, Default)]
pub struct KindRegistry {
    kinds: HashMap<String, KindState>,
}

impl KindRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, kind: &str) -> Option<&KindState> {
        self.kinds.get(kind)
    }

    /// Entry for `kind`, created empty on first use.
    pub fn entry(&mut self, kind: &str) -> &mut KindState {
        self.kinds.entry(kind.to_string()).or_default()
    }

    pub fn instance_count(&self, kind: &str) -> usize {
        self.get(kind).map_or(0, |k| k.instance_count)
    }

    pub fn catching_up(&self, kind: &str) -> Option<bool> {
        self.get(kind).and_then(|k| k.catching_up)
    }
}

/// What kind of mutation happened to an instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateChange {
    Created,
    PrerequisitesSatisfied,
    Launched,
    Message,
    Finished,
    Failed,
    Abdicated,
    CatchUpChanged,
    Removed,
}

/// Records that something changed so a polling consumer can skip work when
/// nothing did. Ordering and correctness never depend on it.
#[derive(Debug, Clone, Default)]
pub struct ChangeTracker {
    changes: Vec<(TaskId, StateChange)>,
}

impl ChangeTracker {
    pub fn record(&mut self, id: &TaskId, change: StateChange) {
        self.changes.push((id.clone(), change));
    }

    pub fn has_changed(&self) -> bool {
        !self.changes.is_empty()
    }

    /// Changes seen since the last call; resets the tracker. Only the
    /// consumer should call this.
    pub fn take(&mut self) -> Vec<(TaskId, StateChange)> {
        std::mem::take(&mut self.changes)
    }
}

/// Context handed to task operations.
#[derive(Debug, Clone, Default)]
pub struct TaskContext {
    pub kinds: KindRegistry,
    pub changes: ChangeTracker,
    /// Prerequisites that refer to cycles before this one are treated as
    /// satisfied at construction: nothing earlier will ever be live again.
    pub history_start: Option<CycleTime>,
}

impl TaskContext {
    pub fn new(history_start: Option<CycleTime>) -> Self {
        Self {
            history_start,
            ..Self::default()
        }
    }
}
