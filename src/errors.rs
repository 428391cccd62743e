// src/errors.rs

//! Crate-wide error aliases and helpers.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SchedulerError {
    /// Malformed or calendar-invalid cycle time text.
    ///
    /// `value` is the human-formatted candidate (`YYYY/MM/DD HH:mm:ss`) when
    /// one could be formed, otherwise the raw input.
    #[error("invalid cycle time ({reason}): {value}")]
    InvalidCycleTime { reason: String, value: String },

    /// Initial-state token that no task constructor understands. Only reachable
    /// through a corrupted state dump, and there is no safe state to assume.
    #[error("unknown initial task state: {0}")]
    UnknownInitialState(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Same-cycle dependency cycle: {0}")]
    DependencyCycle(String),

    #[error("State dump line {line}: {reason}")]
    StateDump { line: usize, reason: String },

    #[error("Unknown task kind: {0}")]
    UnknownTask(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl SchedulerError {
    pub(crate) fn invalid_cycle(reason: impl Into<String>, value: impl Into<String>) -> Self {
        SchedulerError::InvalidCycleTime {
            reason: reason.into(),
            value: value.into(),
        }
    }
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, SchedulerError>;
