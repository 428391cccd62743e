// src/lib.rs

pub mod cli;
pub mod config;
pub mod cycle;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod fs;
pub mod logging;
pub mod manager;
pub mod state;
pub mod task;
pub mod types;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::cli::CliArgs;
use crate::config::loader::load_and_validate;
use crate::config::model::ConfigFile;
use crate::engine::{CoreRuntime, Runtime, RuntimeEvent, RuntimeOptions};
use crate::exec::RealJobLauncher;
use crate::fs::{FileSystem, RealFileSystem};
use crate::manager::TaskManager;
use crate::state::StateStore;

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading
/// - cold start or restart of the task pool
/// - runtime and job launcher
/// - state dump persistence
/// - Ctrl-C handling
pub async fn run(args: CliArgs) -> Result<()> {
    let config_path = PathBuf::from(&args.config);
    let cfg = load_and_validate(&config_path)?;

    let dump_path = args
        .state_dump
        .as_ref()
        .map(PathBuf::from)
        .unwrap_or_else(|| cfg.config.state_dump.clone());
    let fs: Arc<dyn FileSystem> = Arc::new(RealFileSystem);
    let store = StateStore::new(fs, dump_path);

    let manager = if args.restart {
        let records = store.load()?;
        TaskManager::restart(&cfg, records)?
    } else {
        TaskManager::cold_start(&cfg)?
    };

    if args.dry_run {
        print_dry_run(&cfg, manager)?;
        return Ok(());
    }

    // Runtime event channel.
    let (rt_tx, rt_rx) = mpsc::channel::<RuntimeEvent>(256);

    let launcher = RealJobLauncher::new(rt_tx.clone());

    // Ctrl-C → graceful shutdown.
    {
        let tx = rt_tx.clone();
        tokio::spawn(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                eprintln!("failed to listen for Ctrl+C: {e}");
                return;
            }
            let _ = tx.send(RuntimeEvent::ShutdownRequested).await;
        });
    }

    let core = CoreRuntime::new(manager, RuntimeOptions::default());
    let runtime = Runtime::new(core, rt_rx, launcher, store);
    let core = runtime.run().await?;

    info!(remaining = core.manager().len(), "scheduler stopped");
    Ok(())
}

/// Print the suite, the starting pool and what would launch first.
fn print_dry_run(cfg: &ConfigFile, mut manager: TaskManager) -> Result<()> {
    println!("cyclesched dry-run");
    println!("  config.initial_cycle = {}", cfg.config.initial_cycle);
    if let Some(final_cycle) = cfg.config.final_cycle {
        println!("  config.final_cycle = {final_cycle}");
    }
    println!("  config.max_runahead_hours = {}", cfg.config.max_runahead_hours);
    println!("  config.state_dump = {}", cfg.config.state_dump.display());
    println!();

    println!("tasks ({}):", cfg.task.len());
    for kind in cfg.kinds() {
        println!("  - {}", kind.name);
        println!("      job: {}", kind.job);
        if let Some(owner) = &kind.owner {
            println!("      owner: {owner}");
        }
        println!("      abdication: {:?}", kind.abdication);
        if kind.is_contact() {
            println!("      contact: true");
        }
        println!("      quick_death: {}", kind.quick_death);
        println!("      valid_hours: {:?}", kind.valid_hours.hours());
        for template in &kind.prerequisites {
            println!("      prerequisite: {}", template.raw());
        }
        for template in &kind.postrequisites {
            println!("      postrequisite: {}", template.raw());
        }
    }
    println!();

    println!("initial pool:");
    print!("{}", manager.dump_state());
    println!();

    let step = manager.step()?;
    println!("would launch ({}):", step.launched.len());
    for request in &step.launched {
        println!("  - {}", request.id());
    }

    debug!("dry-run complete (no execution)");
    Ok(())
}
