use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

/// When a task kind lets its successor instance be created.
///
/// - `Sequential`: once the instance has finished (or sent an early
///   abdication notice). For kinds whose next cycle depends on this one,
///   e.g. a forecast model that needs its own restart files.
/// - `Parallel`: as soon as the instance is running. For kinds with no
///   dependence on their own previous cycle, so cycles can overlap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AbdicationMode {
    Sequential,
    Parallel,
}

impl Default for AbdicationMode {
    fn default() -> Self {
        AbdicationMode::Sequential
    }
}

impl FromStr for AbdicationMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sequential" => Ok(AbdicationMode::Sequential),
            "parallel" => Ok(AbdicationMode::Parallel),
            other => Err(format!(
                "invalid abdication mode: {other} (expected \"sequential\" or \"parallel\")"
            )),
        }
    }
}

/// Severity attached to an incoming task message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Priority {
    Normal,
    Warning,
    Critical,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Normal => "NORMAL",
            Priority::Warning => "WARNING",
            Priority::Critical => "CRITICAL",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "NORMAL" => Ok(Priority::Normal),
            "WARNING" => Ok(Priority::Warning),
            "CRITICAL" => Ok(Priority::Critical),
            other => Err(format!(
                "invalid message priority: {other} (expected NORMAL, WARNING or CRITICAL)"
            )),
        }
    }
}
