// src/task/state.rs

//! Lifecycle states, restart tokens and task identity.

use std::fmt;
use std::str::FromStr;

use crate::cycle::CycleTime;
use crate::errors::{Result, SchedulerError};

/// Lifecycle of one task instance: `Waiting -> Running -> Finished | Failed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskState {
    Waiting,
    Running,
    Finished,
    Failed,
}

impl TaskState {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskState::Waiting => "waiting",
            TaskState::Running => "running",
            TaskState::Finished => "finished",
            TaskState::Failed => "failed",
        }
    }
}

impl fmt::Display for TaskState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// State an instance is constructed in.
///
/// Cold start and successor spawning always use `Waiting`; the rest only
/// come from a state dump at restart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitialState {
    Waiting,
    /// Waiting, with every prerequisite already satisfied.
    Ready,
    /// Running when the dump was written. Whatever happened to the job is
    /// unknown, so the instance comes back as `Ready` and is relaunched.
    Running,
    Finished,
    Failed,
}

impl InitialState {
    pub fn as_str(&self) -> &'static str {
        match self {
            InitialState::Waiting => "waiting",
            InitialState::Ready => "ready",
            InitialState::Running => "running",
            InitialState::Finished => "finished",
            InitialState::Failed => "failed",
        }
    }
}

impl fmt::Display for InitialState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InitialState {
    type Err = SchedulerError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "waiting" => Ok(InitialState::Waiting),
            "ready" => Ok(InitialState::Ready),
            "running" => Ok(InitialState::Running),
            "finished" => Ok(InitialState::Finished),
            "failed" => Ok(InitialState::Failed),
            other => Err(SchedulerError::UnknownInitialState(other.to_string())),
        }
    }
}

impl From<TaskState> for InitialState {
    fn from(state: TaskState) -> Self {
        match state {
            TaskState::Waiting => InitialState::Waiting,
            TaskState::Running => InitialState::Running,
            TaskState::Finished => InitialState::Finished,
            TaskState::Failed => InitialState::Failed,
        }
    }
}

/// Catch-up status of a contact kind, as written to the state dump.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelativeState {
    CatchingUp,
    CaughtUp,
}

impl RelativeState {
    pub fn from_flag(catching_up: bool) -> Self {
        if catching_up {
            RelativeState::CatchingUp
        } else {
            RelativeState::CaughtUp
        }
    }

    pub fn is_catching_up(&self) -> bool {
        matches!(self, RelativeState::CatchingUp)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RelativeState::CatchingUp => "catching_up",
            RelativeState::CaughtUp => "caught_up",
        }
    }
}

impl fmt::Display for RelativeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RelativeState {
    type Err = SchedulerError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "catching_up" => Ok(RelativeState::CatchingUp),
            "caught_up" => Ok(RelativeState::CaughtUp),
            other => Err(SchedulerError::UnknownInitialState(format!(
                "unknown catch-up state: {other}"
            ))),
        }
    }
}

/// Identity of a live task instance: `(kind, cycle)`, written `kind%cycle`.
///
/// Orders by cycle first, so a pool keyed by `TaskId` iterates oldest first.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId {
    pub cycle: CycleTime,
    pub kind: String,
}

impl TaskId {
    pub fn new(kind: impl Into<String>, cycle: CycleTime) -> Self {
        Self {
            kind: kind.into(),
            cycle,
        }
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%{}", self.kind, self.cycle)
    }
}

impl FromStr for TaskId {
    type Err = SchedulerError;

    fn from_str(s: &str) -> Result<Self> {
        let (kind, cycle) = s.rsplit_once('%').ok_or_else(|| {
            SchedulerError::UnknownTask(format!("task id must be <kind>%<cycle>, not: {s}"))
        })?;
        if kind.is_empty() {
            return Err(SchedulerError::UnknownTask(format!(
                "task id has an empty kind: {s}"
            )));
        }
        Ok(TaskId::new(kind, CycleTime::parse(cycle)?))
    }
}
