// src/exec/task_runner.rs

//! Individual job process runner.

use std::process::Stdio;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::engine::RuntimeEvent;
use crate::exec::messages::spawn_stdout_monitor;
use crate::task::{LaunchRequest, Sentinels, TaskId};
use crate::types::Priority;

/// Run one job to completion.
///
/// Protocol lines on stdout become `TaskMessage` events. If the process
/// cannot be started, or exits non-zero, the instance's failure sentinel
/// is sent at `CRITICAL` after all of its own messages.
pub async fn run_job(request: LaunchRequest, runtime_tx: mpsc::Sender<RuntimeEvent>) {
    let id = request.id();
    let failed = match run_job_inner(&request, &runtime_tx).await {
        Ok(success) => !success,
        Err(err) => {
            error!(task = %id, error = %err, "job execution error");
            true
        }
    };

    if failed {
        send_failure(&id, &runtime_tx).await;
    }
}

/// Returns whether the process exited successfully.
async fn run_job_inner(
    request: &LaunchRequest,
    runtime_tx: &mpsc::Sender<RuntimeEvent>,
) -> Result<bool> {
    let id = request.id();
    info!(task = %id, job = %request.job, "starting job process");

    let mut cmd = Command::new("sh");
    cmd.arg("-c").arg(&request.job);
    cmd.envs(&request.extra)
        .env("TASK_NAME", &request.kind)
        .env("CYCLE_TIME", request.cycle.to_string())
        .env("TASK_ID", id.to_string())
        .env("TASK_OWNER", request.owner.as_deref().unwrap_or_default())
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let mut child = cmd
        .spawn()
        .with_context(|| format!("spawning job for task '{id}'"))?;

    let stdout_monitor = child
        .stdout
        .take()
        .map(|stdout| spawn_stdout_monitor(id.clone(), stdout, runtime_tx.clone()));

    // Always consume stderr so buffers don't fill; log at debug.
    if let Some(stderr) = child.stderr.take() {
        let stderr_id = id.clone();
        tokio::spawn(async move {
            let reader = BufReader::new(stderr);
            let mut lines = reader.lines();

            while let Ok(Some(line)) = lines.next_line().await {
                debug!(task = %stderr_id, "stderr: {}", line);
            }
        });
    }

    let status = child
        .wait()
        .await
        .with_context(|| format!("waiting for job of task '{id}'"))?;

    if let Some(monitor) = stdout_monitor {
        if let Err(e) = monitor.await {
            warn!(task = %id, error = %e, "stdout monitor panicked");
        }
    }

    info!(
        task = %id,
        exit_code = status.code().unwrap_or(-1),
        success = status.success(),
        "job process exited"
    );
    Ok(status.success())
}

async fn send_failure(id: &TaskId, runtime_tx: &mpsc::Sender<RuntimeEvent>) {
    let sentinels = Sentinels::new(&id.kind, id.cycle);
    let event = RuntimeEvent::TaskMessage {
        id: id.clone(),
        priority: Priority::Critical,
        message: sentinels.failed,
    };
    if runtime_tx.send(event).await.is_err() {
        warn!(task = %id, "runtime channel closed; could not report job failure");
    }
}
