// src/engine/event_handlers.rs

//! Event handling logic for the core runtime.

use tracing::{debug, info};

use crate::engine::RuntimeOptions;
use crate::errors::Result;
use crate::manager::TaskManager;
use crate::task::{LaunchRequest, TaskId};
use crate::types::Priority;

/// Command produced by the pure core, to be executed by the outer IO shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoreCommand {
    /// Hand these jobs to the launcher.
    Launch(Vec<LaunchRequest>),
    /// Persist this rendered state dump.
    DumpState(String),
    /// Request that the process exits (suite complete or shutdown).
    RequestExit,
}

/// Decision returned by the core after handling a single `RuntimeEvent`.
#[derive(Debug, Clone)]
pub struct CoreStep {
    /// Commands the IO shell should execute, in order.
    pub commands: Vec<CoreCommand>,
    /// Whether the outer runtime loop should keep running.
    pub keep_running: bool,
}

/// Handle a message from a running job, then advance the pool.
pub fn handle_task_message(
    manager: &mut TaskManager,
    options: &RuntimeOptions,
    id: &TaskId,
    priority: Priority,
    message: &str,
) -> Result<CoreStep> {
    manager.handle_message(id, priority, message);
    advance_pool(manager, options)
}

/// Handle a shutdown request: write a final dump and stop.
pub fn handle_shutdown(manager: &mut TaskManager) -> CoreStep {
    info!("shutdown requested; writing final state dump");
    manager.take_changes();
    CoreStep {
        commands: vec![
            CoreCommand::DumpState(manager.dump_state()),
            CoreCommand::RequestExit,
        ],
        keep_running: false,
    }
}

/// Step the manager to a fixed point and turn the result into commands.
///
/// The core is the only consumer of the change tracker: whenever something
/// changed, the pool summary is logged at debug, a fresh dump is emitted and
/// the tracker is reset.
pub fn advance_pool(manager: &mut TaskManager, options: &RuntimeOptions) -> Result<CoreStep> {
    let step = manager.step()?;
    let mut commands = Vec::new();

    if !step.launched.is_empty() {
        commands.push(CoreCommand::Launch(step.launched));
    }

    if manager.has_changed() {
        let changes = manager.take_changes();
        debug!(changes = changes.len(), "task pool changed");
        for summary in manager.summaries() {
            let outputs = format!(
                "{}/{}",
                summary.n_completed_postrequisites, summary.n_total_postrequisites
            );
            debug!(
                task = %summary.name,
                cycle = %summary.cycle,
                state = %summary.state,
                outputs = %outputs,
                abdicated = summary.abdicated,
                catching_up = ?summary.catching_up,
                latest = %summary.latest_message,
                "pool summary"
            );
        }
        commands.push(CoreCommand::DumpState(manager.dump_state()));
    }

    let mut keep_running = true;
    if options.exit_when_complete && manager.suite_complete() {
        info!("all tasks finished through the final cycle; suite complete");
        keep_running = false;
        commands.push(CoreCommand::RequestExit);
    }

    Ok(CoreStep {
        commands,
        keep_running,
    })
}
