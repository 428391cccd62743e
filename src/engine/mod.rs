// src/engine/mod.rs

//! Orchestration engine for cyclesched.
//!
//! This module ties together:
//! - the task manager (pool, dependency matching, abdication, retention)
//! - the main runtime event loop that reacts to:
//!   - messages from running jobs
//!   - shutdown signals
//!
//! The pure core state machine lives in [`core`]; the async/IO shell is
//! implemented in [`runtime`].

use crate::task::TaskId;
use crate::types::Priority;

/// Runtime options used by both the core and the async shell.
#[derive(Debug, Clone, Copy)]
pub struct RuntimeOptions {
    /// Exit once the suite has a final cycle and every live instance is
    /// finished and abdicated.
    pub exit_when_complete: bool,
}

impl Default for RuntimeOptions {
    fn default() -> Self {
        Self {
            exit_when_complete: true,
        }
    }
}

/// Events flowing into the runtime from job launchers, signal handlers, etc.
#[derive(Debug, Clone)]
pub enum RuntimeEvent {
    /// A running job reported progress, an output or failure.
    TaskMessage {
        id: TaskId,
        priority: Priority,
        message: String,
    },
    /// Graceful shutdown requested (e.g. Ctrl-C).
    ShutdownRequested,
}

pub mod core;
pub mod event_handlers;
pub mod runtime;

pub use self::core::CoreRuntime;
pub use event_handlers::{CoreCommand, CoreStep};
pub use runtime::Runtime;
