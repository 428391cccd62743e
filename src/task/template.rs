// src/task/template.rs

//! Requisite label templates.
//!
//! Config declares labels with placeholders that are rendered per instance:
//! - `$(TASK_NAME)` becomes the kind name;
//! - `$(CYCLE_TIME)` becomes the instance's cycle;
//! - `$(CYCLE_TIME-N)` / `$(CYCLE_TIME+N)` become the cycle `N` hours
//!   earlier / later.

use std::sync::LazyLock;

use regex::{NoExpand, Regex};

use crate::cycle::CycleTime;
use crate::errors::{Result, SchedulerError};

const TASK_NAME: &str = "$(TASK_NAME)";
const CYCLE_PLACEHOLDER: &str = "$(CYCLE_TIME)";

static CYCLE_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$\(CYCLE_TIME\s*(?:([+-])\s*(\d+))?\s*\)").expect("cycle token regex is valid")
});

/// A requisite label with placeholders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequisiteTemplate {
    raw: String,
    offsets: Vec<i64>,
}

/// A template rendered for one instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedRequisite {
    pub label: String,
    /// Earliest cycle the label refers to, if it mentions one.
    pub target_cycle: Option<CycleTime>,
}

impl RequisiteTemplate {
    /// Parse a template, rejecting unknown `$(...)` placeholders.
    pub fn parse(raw: &str) -> Result<Self> {
        let mut offsets = Vec::new();
        for caps in CYCLE_TOKEN.captures_iter(raw) {
            let hours = match caps.get(2) {
                Some(digits) => digits.as_str().parse::<i64>().map_err(|e| {
                    SchedulerError::ConfigError(format!(
                        "bad cycle offset in requisite '{raw}': {e}"
                    ))
                })?,
                None => 0,
            };
            let sign = match caps.get(1).map(|m| m.as_str()) {
                Some("-") => -1,
                _ => 1,
            };
            offsets.push(sign * hours);
        }

        let leftover = CYCLE_TOKEN.replace_all(raw, "").replace(TASK_NAME, "");
        if leftover.contains("$(") {
            return Err(SchedulerError::ConfigError(format!(
                "unknown placeholder in requisite '{raw}' (expected $(TASK_NAME) or $(CYCLE_TIME[+-N]))"
            )));
        }
        if raw.trim().is_empty() {
            return Err(SchedulerError::ConfigError(
                "requisite labels must not be empty".to_string(),
            ));
        }

        Ok(Self {
            raw: raw.to_string(),
            offsets,
        })
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Hour offsets of every cycle placeholder, in order.
    pub fn offsets(&self) -> &[i64] {
        &self.offsets
    }

    pub fn has_offset(&self) -> bool {
        self.offsets.iter().any(|o| *o != 0)
    }

    /// The template with `$(TASK_NAME)` substituted and every cycle
    /// placeholder reduced to a bare `$(CYCLE_TIME)`, plus the first offset.
    ///
    /// Two templates refer to the same label family iff their normalised
    /// text matches.
    pub fn normalized(&self, kind: &str) -> (String, i64) {
        let text = CYCLE_TOKEN
            .replace_all(&self.raw, NoExpand(CYCLE_PLACEHOLDER))
            .replace(TASK_NAME, kind);
        (text, self.offsets.first().copied().unwrap_or(0))
    }

    /// Render for an instance of `kind` at `cycle`.
    pub fn render(&self, kind: &str, cycle: CycleTime) -> Result<RenderedRequisite> {
        let mut label = String::with_capacity(self.raw.len());
        let mut target_cycle: Option<CycleTime> = None;
        let mut last = 0;

        for (caps, offset) in CYCLE_TOKEN.captures_iter(&self.raw).zip(&self.offsets) {
            let Some(whole) = caps.get(0) else {
                continue;
            };
            let at = cycle.offset_hours(*offset)?;
            label.push_str(&self.raw[last..whole.start()]);
            label.push_str(&at.to_string());
            last = whole.end();
            target_cycle = Some(target_cycle.map_or(at, |t| t.min(at)));
        }
        label.push_str(&self.raw[last..]);

        Ok(RenderedRequisite {
            label: label.replace(TASK_NAME, kind),
            target_cycle,
        })
    }
}
