// tests/runtime_fake_launcher.rs

mod common;

use std::sync::{Arc, Mutex};

use tokio::sync::mpsc;

use common::builders::{ConfigFileBuilder, TaskConfigBuilder};
use common::fake_launcher::FakeLauncher;
use common::{init_tracing, tid, with_timeout};
use cyclesched::config::ConfigFile;
use cyclesched::engine::{CoreCommand, CoreRuntime, Runtime, RuntimeEvent, RuntimeOptions};
use cyclesched::fs::mock::MockFileSystem;
use cyclesched::manager::TaskManager;
use cyclesched::state::StateStore;
use cyclesched::task::LaunchRequest;
use cyclesched::types::Priority;

fn two_cycle_suite() -> ConfigFile {
    ConfigFileBuilder::new("2011052600")
        .final_cycle("2011052612")
        .with_task("a", TaskConfigBuilder::new("a.sh").valid_hours(&[0, 12]).build())
        .build()
}

fn launched_ids(launched: &Arc<Mutex<Vec<LaunchRequest>>>) -> Vec<String> {
    launched
        .lock()
        .unwrap()
        .iter()
        .map(|r| r.id().to_string())
        .collect()
}

#[tokio::test]
async fn runs_a_bounded_suite_to_completion() {
    init_tracing();

    let (tx, rx) = mpsc::channel::<RuntimeEvent>(64);
    let launched = Arc::new(Mutex::new(Vec::new()));
    let launcher = FakeLauncher::succeeding(tx.clone(), Arc::clone(&launched));

    let fs = MockFileSystem::new();
    let store = StateStore::new(Arc::new(fs.clone()), "suite.state");

    let manager = TaskManager::cold_start(&two_cycle_suite()).unwrap();
    let core = CoreRuntime::new(manager, RuntimeOptions::default());
    let runtime = Runtime::new(core, rx, launcher, store);

    let core = with_timeout(runtime.run()).await.unwrap();

    assert!(core.manager().is_empty());
    assert!(core.manager().suite_complete());
    assert_eq!(launched_ids(&launched), vec!["a%2011052600", "a%2011052612"]);
    assert_eq!(fs.contents("suite.state"), Some(String::new()));
}

#[tokio::test]
async fn shutdown_writes_a_final_dump() {
    init_tracing();

    let (tx, rx) = mpsc::channel::<RuntimeEvent>(64);
    let launched = Arc::new(Mutex::new(Vec::new()));
    let launcher = FakeLauncher::succeeding(tx.clone(), Arc::clone(&launched));

    // Queued before anything is launched, so it is handled first.
    tx.send(RuntimeEvent::ShutdownRequested).await.unwrap();

    let fs = MockFileSystem::new();
    let store = StateStore::new(Arc::new(fs.clone()), "suite.state");
    let manager = TaskManager::cold_start(&two_cycle_suite()).unwrap();
    let core = CoreRuntime::new(manager, RuntimeOptions::default());

    let core = with_timeout(Runtime::new(core, rx, launcher, store).run())
        .await
        .unwrap();

    assert_eq!(launched_ids(&launched), vec!["a%2011052600"]);
    assert_eq!(core.manager().len(), 1);
    assert_eq!(
        fs.contents("suite.state").as_deref(),
        Some("2011052600 a False running\n")
    );
}

#[tokio::test]
async fn failed_job_keeps_the_suite_alive() {
    init_tracing();

    let (tx, rx) = mpsc::channel::<RuntimeEvent>(64);
    let launched = Arc::new(Mutex::new(Vec::new()));
    let launcher = FakeLauncher::new(
        tx.clone(),
        Arc::clone(&launched),
        Arc::new(|req: &LaunchRequest| {
            vec![(
                Priority::Critical,
                format!("{} failed for {}", req.kind, req.cycle),
            )]
        }),
    );

    let fs = MockFileSystem::new();
    let store = StateStore::new(Arc::new(fs.clone()), "suite.state");
    let manager = TaskManager::cold_start(&two_cycle_suite()).unwrap();
    let core = CoreRuntime::new(manager, RuntimeOptions::default());
    let handle = tokio::spawn(Runtime::new(core, rx, launcher, store).run());

    // Wait for the failure to reach the dump, then stop the runtime.
    with_timeout(async {
        loop {
            if fs
                .contents("suite.state")
                .is_some_and(|text| text.contains("failed"))
            {
                break;
            }
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        }
    })
    .await;
    tx.send(RuntimeEvent::ShutdownRequested).await.unwrap();

    let core = with_timeout(handle).await.unwrap().unwrap();
    let task = core.manager().task(&tid("a", "2011052600")).unwrap();
    assert!(task.is_failed());
    assert!(!core.manager().suite_complete());
    assert_eq!(launched_ids(&launched), vec!["a%2011052600"]);
}

#[test]
fn core_start_launches_and_dumps() {
    let manager = TaskManager::cold_start(&two_cycle_suite()).unwrap();
    let mut core = CoreRuntime::new(manager, RuntimeOptions::default());

    let step = core.start().unwrap();
    assert!(step.keep_running);
    assert_eq!(step.commands.len(), 2);
    match &step.commands[0] {
        CoreCommand::Launch(jobs) => {
            assert_eq!(jobs.len(), 1);
            assert_eq!(jobs[0].id(), tid("a", "2011052600"));
        }
        other => panic!("expected a launch first, got {other:?}"),
    }
    assert_eq!(
        step.commands[1],
        CoreCommand::DumpState("2011052600 a False running\n".to_string())
    );
}

#[test]
fn core_ignores_unchanged_pool() {
    let manager = TaskManager::cold_start(&two_cycle_suite()).unwrap();
    let mut core = CoreRuntime::new(manager, RuntimeOptions::default());
    core.start().unwrap();

    let step = core
        .step(RuntimeEvent::TaskMessage {
            id: tid("b", "2011052600"),
            priority: Priority::Normal,
            message: "b finished for 2011052600".to_string(),
        })
        .unwrap();
    assert!(step.commands.is_empty());
    assert!(step.keep_running);
}

#[test]
fn core_shutdown_dumps_then_exits() {
    let manager = TaskManager::cold_start(&two_cycle_suite()).unwrap();
    let mut core = CoreRuntime::new(manager, RuntimeOptions::default());

    let step = core.step(RuntimeEvent::ShutdownRequested).unwrap();
    assert!(!step.keep_running);
    assert_eq!(
        step.commands,
        vec![
            CoreCommand::DumpState("2011052600 a False waiting\n".to_string()),
            CoreCommand::RequestExit,
        ]
    );
}

#[test]
fn exit_on_completion_can_be_disabled() {
    let manager = TaskManager::cold_start(&two_cycle_suite()).unwrap();
    let mut core = CoreRuntime::new(
        manager,
        RuntimeOptions {
            exit_when_complete: false,
        },
    );
    core.start().unwrap();

    let id = tid("a", "2011052600");
    for message in ["a started for 2011052600", "a finished for 2011052600"] {
        core.step(RuntimeEvent::TaskMessage {
            id: id.clone(),
            priority: Priority::Normal,
            message: message.to_string(),
        })
        .unwrap();
    }
    let id = tid("a", "2011052612");
    let mut last = None;
    for message in ["a started for 2011052612", "a finished for 2011052612"] {
        last = Some(
            core.step(RuntimeEvent::TaskMessage {
                id: id.clone(),
                priority: Priority::Normal,
                message: message.to_string(),
            })
            .unwrap(),
        );
    }

    let last = last.unwrap();
    assert!(core.manager().suite_complete());
    assert!(last.keep_running);
    assert!(!last.commands.contains(&CoreCommand::RequestExit));
}
