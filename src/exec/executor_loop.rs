// src/exec/executor_loop.rs

//! Main executor loop that manages running job processes.

use std::collections::HashMap;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::engine::RuntimeEvent;
use crate::exec::task_runner::run_job;
use crate::task::{LaunchRequest, TaskId};

/// Spawn the background executor loop.
///
/// The returned sender is what `RealJobLauncher` forwards requests to. Each
/// job runs in its own Tokio task, and **per task instance there is never
/// more than one job active at the same time**: a second request for an
/// instance whose job is still running is dropped with a warning.
pub fn spawn_executor(runtime_tx: mpsc::Sender<RuntimeEvent>) -> mpsc::Sender<LaunchRequest> {
    let (tx, mut rx) = mpsc::channel::<LaunchRequest>(32);

    tokio::spawn(async move {
        info!("executor loop started");

        let mut active: HashMap<TaskId, JoinHandle<()>> = HashMap::new();

        while let Some(request) = rx.recv().await {
            active.retain(|_, handle| !handle.is_finished());
            handle_launch_request(request, &mut active, &runtime_tx);
        }

        info!("executor loop finished (channel closed)");
    });

    tx
}

fn handle_launch_request(
    request: LaunchRequest,
    active: &mut HashMap<TaskId, JoinHandle<()>>,
    runtime_tx: &mpsc::Sender<RuntimeEvent>,
) {
    let id = request.id();

    if active.contains_key(&id) {
        warn!(task = %id, "job already active for this task; ignoring launch request");
        return;
    }

    let rt_tx = runtime_tx.clone();
    let spawn_id = id.clone();
    let handle = tokio::spawn(async move {
        run_job(request, rt_tx).await;
        debug!(task = %spawn_id, "job runner future finished");
    });

    active.insert(id, handle);
}
