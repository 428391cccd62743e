// src/engine/runtime.rs

use std::fmt;

use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::errors::Result;
use crate::exec::JobLauncher;
use crate::state::StateStore;
use crate::task::LaunchRequest;

use super::core::CoreRuntime;
use super::{CoreCommand, RuntimeEvent};

/// Drives the task manager in response to `RuntimeEvent`s, delegates job
/// launches to a `JobLauncher` and persists state dumps.
///
/// This is a pure IO shell around `CoreRuntime`, which contains all the
/// runtime semantics.
pub struct Runtime<L: JobLauncher> {
    core: CoreRuntime,
    event_rx: mpsc::Receiver<RuntimeEvent>,
    launcher: L,
    store: StateStore,
}

impl<L: JobLauncher> fmt::Debug for Runtime<L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Runtime")
            .field("core", &self.core)
            .field("store", &self.store)
            .finish_non_exhaustive()
    }
}

impl<L: JobLauncher> Runtime<L> {
    pub fn new(
        core: CoreRuntime,
        event_rx: mpsc::Receiver<RuntimeEvent>,
        launcher: L,
        store: StateStore,
    ) -> Self {
        Self {
            core,
            event_rx,
            launcher,
            store,
        }
    }

    /// Main event loop.
    ///
    /// - Runs the core's start step (initial launches and dump).
    /// - Consumes `RuntimeEvent`s from `event_rx`.
    /// - Feeds them into the core runtime.
    /// - Executes commands returned by the core (launch, dump, exit).
    ///
    /// Returns the core so callers can inspect the final pool.
    pub async fn run(mut self) -> Result<CoreRuntime> {
        info!(state_dump = ?self.store.path(), "cyclesched runtime started");

        let step = self.core.start()?;
        for command in step.commands {
            self.execute_command(command).await?;
        }

        if step.keep_running {
            loop {
                let event = match self.event_rx.recv().await {
                    Some(e) => e,
                    None => {
                        info!("runtime event channel closed; exiting");
                        break;
                    }
                };

                debug!(?event, "runtime received event");

                // Feed the event into the pure core and get commands back.
                let step = self.core.step(event)?;

                for command in step.commands {
                    self.execute_command(command).await?;
                }

                if !step.keep_running {
                    info!("core requested exit; stopping runtime");
                    break;
                }
            }
        }

        info!("runtime exiting");
        Ok(self.core)
    }

    /// Execute a single command from the core.
    async fn execute_command(&mut self, command: CoreCommand) -> Result<()> {
        match command {
            CoreCommand::Launch(jobs) => {
                self.launch(jobs).await?;
            }
            CoreCommand::DumpState(text) => {
                self.store.save(&text)?;
            }
            CoreCommand::RequestExit => {
                // The core already returns keep_running=false alongside this.
                info!("core issued RequestExit command");
            }
        }
        Ok(())
    }

    async fn launch(&mut self, jobs: Vec<LaunchRequest>) -> Result<()> {
        if jobs.is_empty() {
            return Ok(());
        }

        let ids: Vec<String> = jobs.iter().map(|j| j.id().to_string()).collect();
        debug!(?ids, "launching jobs");

        self.launcher.launch(jobs).await
    }
}
