use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use tokio::sync::mpsc;
use tracing::debug;
use cyclesched::engine::RuntimeEvent;
use cyclesched::errors::Result;
use cyclesched::exec::JobLauncher;
use cyclesched::task::LaunchRequest;
use cyclesched::types::Priority;

/// Messages a fake job sends back for one launch.
pub type Responder = Arc<dyn Fn(&LaunchRequest) -> Vec<(Priority, String)> + Send + Sync>;

/// The default outputs of a kind that declares no postrequisites.
pub fn default_outputs(request: &LaunchRequest) -> Vec<(Priority, String)> {
    vec![
        (
            Priority::Normal,
            format!("{} started for {}", request.kind, request.cycle),
        ),
        (
            Priority::Normal,
            format!("{} finished for {}", request.kind, request.cycle),
        ),
    ]
}

/// A fake launcher that:
/// - records every launch request
/// - replies with scripted messages from a background task, so the runtime
///   is never blocked on its own channel.
pub struct FakeLauncher {
    runtime_tx: mpsc::Sender<RuntimeEvent>,
    launched: Arc<Mutex<Vec<LaunchRequest>>>,
    responder: Responder,
}

impl FakeLauncher {
    pub fn new(
        runtime_tx: mpsc::Sender<RuntimeEvent>,
        launched: Arc<Mutex<Vec<LaunchRequest>>>,
        responder: Responder,
    ) -> Self {
        Self {
            runtime_tx,
            launched,
            responder,
        }
    }

    /// Every job reports the default started/finished outputs.
    pub fn succeeding(
        runtime_tx: mpsc::Sender<RuntimeEvent>,
        launched: Arc<Mutex<Vec<LaunchRequest>>>,
    ) -> Self {
        Self::new(runtime_tx, launched, Arc::new(default_outputs))
    }
}

impl JobLauncher for FakeLauncher {
    fn launch(
        &mut self,
        jobs: Vec<LaunchRequest>,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        let tx = self.runtime_tx.clone();
        let launched = Arc::clone(&self.launched);
        let responder = Arc::clone(&self.responder);

        Box::pin(async move {
            for job in jobs {
                debug!(task = %job.id(), "fake launch");
                launched.lock().unwrap().push(job.clone());

                let replies = responder(&job);
                let tx = tx.clone();
                tokio::spawn(async move {
                    for (priority, message) in replies {
                        let event = RuntimeEvent::TaskMessage {
                            id: job.id(),
                            priority,
                            message,
                        };
                        if tx.send(event).await.is_err() {
                            break;
                        }
                    }
                });
            }
            Ok(())
        })
    }
}
