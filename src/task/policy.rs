// src/task/policy.rs

//! Per-kind abdication policy and the contact-kind catch-up extension.

use tracing::debug;

use crate::task::context::KindState;
use crate::task::state::{RelativeState, TaskState, TaskId};
use crate::types::AbdicationMode;

/// Decides when an instance may let its successor be created.
///
/// The answer is evaluated fresh on every call from the instance's current
/// state; having passed through `Running` earlier counts for nothing.
pub trait AbdicationPolicy: Send + Sync {
    fn ready_to_abdicate(&self, state: TaskState, early_notice: bool) -> bool;
}

/// Successor waits for this instance to finish (or to say it may go early).
#[derive(Debug, Clone, Copy, Default)]
pub struct Sequential;

/// Successor may be created as soon as this instance is running.
#[derive(Debug, Clone, Copy, Default)]
pub struct Parallel;

impl AbdicationPolicy for Sequential {
    fn ready_to_abdicate(&self, state: TaskState, early_notice: bool) -> bool {
        early_notice || state == TaskState::Finished
    }
}

impl AbdicationPolicy for Parallel {
    fn ready_to_abdicate(&self, state: TaskState, early_notice: bool) -> bool {
        state == TaskState::Running || early_notice || state == TaskState::Finished
    }
}

impl AbdicationMode {
    pub fn policy(&self) -> &'static dyn AbdicationPolicy {
        match self {
            AbdicationMode::Sequential => &Sequential,
            AbdicationMode::Parallel => &Parallel,
        }
    }
}

/// Catch-up messages understood by contact kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatchUpSignal {
    /// `CATCHINGUP:...`
    CatchingUp,
    /// `CAUGHTUP:...`
    CaughtUp,
}

impl CatchUpSignal {
    pub fn from_message(message: &str) -> Option<Self> {
        if message.starts_with("CATCHINGUP:") {
            Some(CatchUpSignal::CatchingUp)
        } else if message.starts_with("CAUGHTUP:") {
            Some(CatchUpSignal::CaughtUp)
        } else {
            None
        }
    }
}

/// Marks a kind as waiting on an external real-world event.
///
/// The catch-up flag itself is shared by every instance of the kind and
/// lives in that kind's [`KindState`]; this only knows how to start it and
/// how messages move it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContactExtension {
    pub initial: RelativeState,
}

impl Default for ContactExtension {
    fn default() -> Self {
        Self {
            initial: RelativeState::CatchingUp,
        }
    }
}

impl ContactExtension {
    /// Give the kind its flag the first time an instance appears.
    pub fn register(&self, state: &mut KindState) {
        if state.catching_up.is_none() {
            state.catching_up = Some(self.initial.is_catching_up());
        }
    }

    /// Current relative state of the kind.
    pub fn relative_state(&self, state: &KindState) -> RelativeState {
        RelativeState::from_flag(state.catching_up.unwrap_or(self.initial.is_catching_up()))
    }

    /// Apply a catch-up message. Returns `true` if the shared flag changed.
    ///
    /// Only `CAUGHTUP` ever moves the flag. Falling behind after being caught
    /// up is logged but not acted on: switching back would shrink dependent
    /// kinds' windows and could let still-needed history be deleted.
    pub fn apply(&self, id: &TaskId, signal: CatchUpSignal, state: &mut KindState) -> bool {
        let catching_up = state.catching_up.unwrap_or(self.initial.is_catching_up());
        match (signal, catching_up) {
            (CatchUpSignal::CatchingUp, false) => {
                debug!(task = %id, "falling behind the pace; staying in caught-up mode");
                false
            }
            (CatchUpSignal::CatchingUp, true) => false,
            (CatchUpSignal::CaughtUp, true) => {
                debug!(task = %id, "just caught up");
                state.catching_up = Some(false);
                true
            }
            (CatchUpSignal::CaughtUp, false) => false,
        }
    }
}
