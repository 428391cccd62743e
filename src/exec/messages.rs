// src/exec/messages.rs

//! Job stdout protocol.
//!
//! A job reports to the scheduler by printing lines of the form
//! `NORMAL: text`, `WARNING: text` or `CRITICAL: text`. Anything else is
//! ordinary job output and is only logged.

use std::sync::LazyLock;

use regex::Regex;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::ChildStdout;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::engine::RuntimeEvent;
use crate::task::TaskId;
use crate::types::Priority;

static MESSAGE_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(NORMAL|WARNING|CRITICAL):\s*(.*?)\s*$").expect("message line regex is valid")
});

/// Split a stdout line into a task message, if it is one.
pub fn parse_message_line(line: &str) -> Option<(Priority, String)> {
    let caps = MESSAGE_LINE.captures(line)?;
    let priority = caps.get(1)?.as_str().parse::<Priority>().ok()?;
    let text = caps.get(2)?.as_str();
    if text.is_empty() {
        return None;
    }
    Some((priority, text.to_string()))
}

/// Forward protocol lines from a job's stdout to the runtime until the pipe
/// closes. Await the handle to know every message has been sent.
pub fn spawn_stdout_monitor(
    id: TaskId,
    stdout: ChildStdout,
    runtime_tx: mpsc::Sender<RuntimeEvent>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let reader = BufReader::new(stdout);
        let mut lines = reader.lines();

        while let Ok(Some(line)) = lines.next_line().await {
            let Some((priority, message)) = parse_message_line(&line) else {
                debug!(task = %id, "stdout: {}", line);
                continue;
            };

            let event = RuntimeEvent::TaskMessage {
                id: id.clone(),
                priority,
                message,
            };
            if runtime_tx.send(event).await.is_err() {
                warn!(task = %id, "runtime channel closed; dropping job messages");
                break;
            }
        }

        debug!(task = %id, "stdout monitor ended");
    })
}
