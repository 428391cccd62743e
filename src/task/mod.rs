// src/task/mod.rs

//! Task instances and everything they are built from.
//!
//! - `state`: lifecycle states, restart tokens and [`TaskId`].
//! - `requisites`: labelled boolean condition sets.
//! - `template`: `$(TASK_NAME)` / `$(CYCLE_TIME±N)` requisite templates.
//! - `kind`: static per-kind definitions and launch requests.
//! - `policy`: abdication policies and the contact extension.
//! - `message`: incoming message classification.
//! - `context`: per-kind shared state and change tracking.
//! - `instance`: the [`Task`] state machine itself.

pub mod context;
pub mod instance;
pub mod kind;
pub mod message;
pub mod policy;
pub mod requisites;
pub mod state;
pub mod template;

pub use context::{ChangeTracker, KindRegistry, KindState, StateChange, TaskContext};
pub use instance::{Task, TaskSummary};
pub use kind::{LaunchRequest, TaskKind, DEFAULT_POSTREQUISITES};
pub use message::{classify, MessageKind, MessageMatch, Sentinels};
pub use policy::{AbdicationPolicy, CatchUpSignal, ContactExtension, Parallel, Sequential};
pub use requisites::RequisiteSet;
pub use state::{InitialState, RelativeState, TaskId, TaskState};
pub use template::{RenderedRequisite, RequisiteTemplate};
