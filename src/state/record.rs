// src/state/record.rs

//! One line of the state dump.
//!
//! ```text
//! <cycle> <kind> <True|False> <state>[:<catching_up|caught_up>]
//! ```
//!
//! Cycle first so the file sorts and hand-edits easily.

use std::fmt;

use crate::cycle::CycleTime;
use crate::errors::{Result, SchedulerError};
use crate::task::{InitialState, RelativeState};

/// Flattened constructor arguments for one live instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateRecord {
    pub cycle: CycleTime,
    pub kind: String,
    pub abdicated: bool,
    pub state: InitialState,
    /// Only written for contact kinds.
    pub relative: Option<RelativeState>,
}

impl StateRecord {
    /// Parse one non-empty line. `line_no` is 1-based and only used for
    /// error reporting.
    ///
    /// A state token nobody understands is `UnknownInitialState`; every
    /// other malformation is `StateDump`.
    pub fn parse(line_no: usize, line: &str) -> Result<Self> {
        let malformed = |reason: String| SchedulerError::StateDump {
            line: line_no,
            reason,
        };

        let fields: Vec<&str> = line.split_whitespace().collect();
        let [cycle, kind, abdicated, state] = fields.as_slice() else {
            return Err(malformed(format!(
                "expected 4 fields (cycle kind abdicated state), found {}",
                fields.len()
            )));
        };

        let cycle = CycleTime::parse(cycle).map_err(|e| malformed(e.to_string()))?;

        let abdicated = match *abdicated {
            "True" => true,
            "False" => false,
            other => {
                return Err(malformed(format!(
                    "abdicated flag must be True or False, found '{other}'"
                )));
            }
        };

        let (state, relative) = match state.split_once(':') {
            Some((state, relative)) => (state, Some(relative.parse::<RelativeState>()?)),
            None => (*state, None),
        };

        Ok(Self {
            cycle,
            kind: (*kind).to_string(),
            abdicated,
            state: state.parse()?,
            relative,
        })
    }
}

impl fmt::Display for StateRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let abdicated = if self.abdicated { "True" } else { "False" };
        write!(f, "{} {} {} {}", self.cycle, self.kind, abdicated, self.state)?;
        if let Some(relative) = self.relative {
            write!(f, ":{relative}")?;
        }
        Ok(())
    }
}

/// Parse a whole dump. Blank lines and `#` comments are skipped.
pub fn parse_state_dump(text: &str) -> Result<Vec<StateRecord>> {
    text.lines()
        .enumerate()
        .filter(|(_, line)| {
            let line = line.trim();
            !line.is_empty() && !line.starts_with('#')
        })
        .map(|(idx, line)| StateRecord::parse(idx + 1, line))
        .collect()
}

/// Render records one per line, sorted by cycle then kind.
pub fn render_state_dump(records: &[StateRecord]) -> String {
    let mut sorted: Vec<&StateRecord> = records.iter().collect();
    sorted.sort_by(|a, b| a.cycle.cmp(&b.cycle).then_with(|| a.kind.cmp(&b.kind)));

    let mut out = String::new();
    for record in sorted {
        out.push_str(&record.to_string());
        out.push('\n');
    }
    out
}
