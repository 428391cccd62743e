// src/exec/mod.rs

//! Job execution layer.
//!
//! This module actually runs the job scripts behind launch requests, using
//! `tokio::process::Command`, and reports back to the orchestration runtime
//! via `RuntimeEvent`s.
//!
//! - [`executor_loop`] owns the loop that manages job processes.
//! - [`task_runner`] handles one job process.
//! - [`messages`] parses the job stdout message protocol.
//! - [`backend`] provides the `JobLauncher` trait and the concrete
//!   `RealJobLauncher` used in production, which tests replace with a fake.

pub mod backend;
pub mod executor_loop;
pub mod messages;
pub mod task_runner;

pub use backend::{JobLauncher, RealJobLauncher};
pub use executor_loop::spawn_executor;
pub use messages::parse_message_line;
