// src/exec/backend.rs

//! Pluggable job launcher abstraction.
//!
//! The runtime talks to a `JobLauncher` instead of spawning processes
//! itself. The core never builds a submission command; it only hands over a
//! [`LaunchRequest`] and expects progress messages back as `RuntimeEvent`s.
//!
//! - `RealJobLauncher` is the default implementation used by `cyclesched`.
//!   It wraps the executor loop and forwards requests over an mpsc channel.
//! - Tests can provide their own `JobLauncher` that, for example, records
//!   launches and replies with scripted messages.

use std::future::Future;
use std::pin::Pin;

use tokio::sync::mpsc;

use crate::engine::RuntimeEvent;
use crate::errors::{Error, Result};
use crate::task::LaunchRequest;

use super::executor_loop::spawn_executor;

/// Trait abstracting how jobs are started.
pub trait JobLauncher: Send {
    /// Start the given jobs.
    ///
    /// The implementation is free to:
    /// - spawn OS processes (production)
    /// - simulate job output and emit `RuntimeEvent`s (tests)
    fn launch(
        &mut self,
        jobs: Vec<LaunchRequest>,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>>;
}

/// Launcher used in production: runs each job as a local shell process.
pub struct RealJobLauncher {
    tx: mpsc::Sender<LaunchRequest>,
}

impl RealJobLauncher {
    /// Create a launcher wired to the given runtime event sender.
    ///
    /// This spawns the background executor loop immediately.
    pub fn new(runtime_tx: mpsc::Sender<RuntimeEvent>) -> Self {
        let tx = spawn_executor(runtime_tx);
        Self { tx }
    }
}

impl JobLauncher for RealJobLauncher {
    fn launch(
        &mut self,
        jobs: Vec<LaunchRequest>,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        // Clone the sender so the future doesn't borrow `self` across `await`.
        let tx = self.tx.clone();

        Box::pin(async move {
            for job in jobs {
                tx.send(job).await.map_err(Error::from)?;
            }
            Ok(())
        })
    }
}
