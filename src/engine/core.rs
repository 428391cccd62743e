// src/engine/core.rs

//! Pure core runtime state machine.
//!
//! This module contains a synchronous, deterministic "core runtime" that
//! consumes [`RuntimeEvent`]s and produces:
//! - an updated task pool
//! - a list of "commands" describing what the IO shell should do next
//!
//! The async/IO-heavy shell (`engine::runtime::Runtime`) is responsible for:
//! - reading events from channels
//! - handing launch requests to the job launcher
//! - writing the state dump
//!
//! The core is intended to be unit tested without any Tokio, channels,
//! filesystem, or processes.

use crate::engine::event_handlers::{advance_pool, handle_shutdown, handle_task_message, CoreStep};
use crate::engine::{RuntimeEvent, RuntimeOptions};
use crate::errors::Result;
use crate::manager::TaskManager;

/// Pure core runtime state.
///
/// It has **no** channels, no Tokio types, and does not perform any IO.
#[derive(Debug)]
pub struct CoreRuntime {
    manager: TaskManager,
    options: RuntimeOptions,
}

impl CoreRuntime {
    pub fn new(manager: TaskManager, options: RuntimeOptions) -> Self {
        Self { manager, options }
    }

    pub fn manager(&self) -> &TaskManager {
        &self.manager
    }

    /// First step after cold start or restart: launch whatever is already
    /// ready and write the initial dump.
    pub fn start(&mut self) -> Result<CoreStep> {
        advance_pool(&mut self.manager, &self.options)
    }

    /// Handle a single runtime event, updating core state and returning the
    /// resulting commands for the IO shell.
    pub fn step(&mut self, event: RuntimeEvent) -> Result<CoreStep> {
        match event {
            RuntimeEvent::TaskMessage {
                id,
                priority,
                message,
            } => handle_task_message(&mut self.manager, &self.options, &id, priority, &message),
            RuntimeEvent::ShutdownRequested => Ok(handle_shutdown(&mut self.manager)),
        }
    }
}
