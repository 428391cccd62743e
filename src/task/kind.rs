// src/task/kind.rs

//! Static per-kind definitions derived from config, plus launch requests.

use std::collections::BTreeMap;

use crate::config::model::TaskConfig;
use crate::cycle::{CycleTime, ValidHours};
use crate::errors::{Result, SchedulerError};
use crate::task::policy::{AbdicationPolicy, ContactExtension};
use crate::task::requisites::RequisiteSet;
use crate::task::state::TaskId;
use crate::task::template::RequisiteTemplate;
use crate::types::AbdicationMode;

/// Outputs a kind reports when it declares none of its own.
pub const DEFAULT_POSTREQUISITES: [&str; 2] = [
    "$(TASK_NAME) started for $(CYCLE_TIME)",
    "$(TASK_NAME) finished for $(CYCLE_TIME)",
];

/// Everything that is the same for every instance of one kind.
#[derive(Debug, Clone)]
pub struct TaskKind {
    pub name: String,
    /// Job script reference handed to the launcher.
    pub job: String,
    pub owner: Option<String>,
    pub abdication: AbdicationMode,
    pub contact: Option<ContactExtension>,
    /// Whether finished instances can go as soon as nothing at an equal or
    /// older cycle is still waiting or unabdicated. Kinds whose outputs are
    /// consumed by later cycles must set this to `false`.
    pub quick_death: bool,
    pub valid_hours: ValidHours,
    pub prerequisites: Vec<RequisiteTemplate>,
    pub postrequisites: Vec<RequisiteTemplate>,
    /// Extra launch parameters, exported to the job environment.
    pub environment: BTreeMap<String, String>,
}

impl TaskKind {
    pub fn from_config(name: &str, cfg: &TaskConfig) -> Result<Self> {
        if cfg.job.trim().is_empty() {
            return Err(SchedulerError::ConfigError(format!(
                "task '{name}' has an empty `job`"
            )));
        }

        let valid_hours = ValidHours::new(cfg.valid_hours.iter().copied()).map_err(|e| match e {
            SchedulerError::ConfigError(msg) => {
                SchedulerError::ConfigError(format!("task '{name}': {msg}"))
            }
            other => other,
        })?;

        let prerequisites = cfg
            .prerequisites
            .iter()
            .map(|raw| RequisiteTemplate::parse(raw))
            .collect::<Result<Vec<_>>>()?;

        let postrequisites = if cfg.postrequisites.is_empty() {
            DEFAULT_POSTREQUISITES
                .iter()
                .map(|raw| RequisiteTemplate::parse(raw))
                .collect::<Result<Vec<_>>>()?
        } else {
            cfg.postrequisites
                .iter()
                .map(|raw| RequisiteTemplate::parse(raw))
                .collect::<Result<Vec<_>>>()?
        };

        if let Some(bad) = postrequisites.iter().find(|t| t.has_offset()) {
            return Err(SchedulerError::ConfigError(format!(
                "task '{name}': postrequisite '{}' may not use a cycle offset",
                bad.raw()
            )));
        }

        Ok(Self {
            name: name.to_string(),
            job: cfg.job.clone(),
            owner: cfg.owner.clone(),
            abdication: cfg.abdication,
            contact: cfg.contact.then(ContactExtension::default),
            quick_death: cfg.quick_death,
            valid_hours,
            prerequisites,
            postrequisites,
            environment: cfg.environment.clone(),
        })
    }

    pub fn policy(&self) -> &'static dyn AbdicationPolicy {
        self.abdication.policy()
    }

    pub fn is_contact(&self) -> bool {
        self.contact.is_some()
    }

    /// Prerequisites for the instance at `cycle`.
    ///
    /// Labels that only refer to cycles before `history_start` come back
    /// satisfied.
    pub fn render_prerequisites(
        &self,
        cycle: CycleTime,
        history_start: Option<CycleTime>,
    ) -> Result<RequisiteSet> {
        let mut set = RequisiteSet::new();
        for template in &self.prerequisites {
            let rendered = template.render(&self.name, cycle)?;
            set.add(rendered.label.clone());
            let before_history = match (rendered.target_cycle, history_start) {
                (Some(target), Some(start)) => target < start,
                _ => false,
            };
            if before_history {
                set.satisfy(&rendered.label);
            }
        }
        Ok(set)
    }

    /// Postrequisites (outputs) for the instance at `cycle`.
    pub fn render_postrequisites(&self, cycle: CycleTime) -> Result<RequisiteSet> {
        let mut set = RequisiteSet::new();
        for template in &self.postrequisites {
            set.add(template.render(&self.name, cycle)?.label);
        }
        Ok(set)
    }
}

/// What the job launcher is told when an instance starts running.
///
/// The core never builds a submission command; it only hands this over.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchRequest {
    pub owner: Option<String>,
    pub kind: String,
    pub cycle: CycleTime,
    pub job: String,
    pub extra: BTreeMap<String, String>,
}

impl LaunchRequest {
    pub fn from_kind(kind: &TaskKind, cycle: CycleTime) -> Self {
        Self {
            owner: kind.owner.clone(),
            kind: kind.name.clone(),
            cycle,
            job: kind.job.clone(),
            extra: kind.environment.clone(),
        }
    }

    pub fn id(&self) -> TaskId {
        TaskId::new(self.kind.clone(), self.cycle)
    }
}
