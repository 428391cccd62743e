// src/cli.rs

//! CLI argument parsing using `clap`.

use clap::{Parser, ValueEnum};

/// Command-line arguments for `cyclesched`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "cyclesched",
    version,
    about = "Schedule cycling, time-indexed task suites.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the suite file (TOML).
    #[arg(long, value_name = "PATH", default_value = "suite.toml")]
    pub config: String,

    /// Rebuild the task pool from the state dump instead of cold starting.
    #[arg(long)]
    pub restart: bool,

    /// State dump location; overrides `[config].state_dump`.
    #[arg(long, value_name = "PATH")]
    pub state_dump: Option<String>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `CYCLESCHED_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Parse + validate, print the suite and initial pool, but don't launch
    /// anything.
    #[arg(long)]
    pub dry_run: bool,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
