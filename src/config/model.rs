// src/config/model.rs

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

use serde::Deserialize;

use crate::cycle::CycleTime;
use crate::task::TaskKind;
use crate::types::AbdicationMode;

/// Suite file exactly as deserialized from TOML, before validation.
///
/// ```toml
/// [config]
/// initial_cycle = "2011052600"
/// final_cycle = "2011053000"
///
/// [task.obs]
/// job = "bin/get_obs.sh"
/// abdication = "parallel"
/// contact = true
/// valid_hours = [0, 6, 12, 18]
/// postrequisites = ["obs finished for $(CYCLE_TIME)"]
///
/// [task.model]
/// job = "bin/model.sh"
/// quick_death = false
/// valid_hours = [0, 6, 12, 18]
/// prerequisites = ["obs finished for $(CYCLE_TIME)",
///                  "model restart ready for $(CYCLE_TIME-6)"]
/// postrequisites = ["model restart ready for $(CYCLE_TIME)",
///                   "model finished for $(CYCLE_TIME)"]
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct RawConfigFile {
    pub config: ConfigSection,

    /// All task kinds from `[task.<name>]`, keyed by kind name.
    #[serde(default)]
    pub task: BTreeMap<String, TaskConfig>,
}

/// Validated suite definition.
///
/// Only constructed through `TryFrom<RawConfigFile>`, which also builds the
/// per-kind [`TaskKind`] definitions.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    pub config: ConfigSection,
    pub task: BTreeMap<String, TaskConfig>,
    kinds: BTreeMap<String, Arc<TaskKind>>,
}

impl ConfigFile {
    pub(crate) fn new_unchecked(
        config: ConfigSection,
        task: BTreeMap<String, TaskConfig>,
        kinds: BTreeMap<String, Arc<TaskKind>>,
    ) -> Self {
        Self {
            config,
            task,
            kinds,
        }
    }

    pub fn kind(&self, name: &str) -> Option<&Arc<TaskKind>> {
        self.kinds.get(name)
    }

    /// Kinds in name order.
    pub fn kinds(&self) -> impl Iterator<Item = &Arc<TaskKind>> {
        self.kinds.values()
    }
}

/// `[config]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct ConfigSection {
    /// First cycle of a cold start.
    pub initial_cycle: CycleTime,

    /// No successor is created beyond this cycle. Unbounded when absent.
    #[serde(default)]
    pub final_cycle: Option<CycleTime>,

    /// How far (in hours) a waiting instance may launch ahead of the oldest
    /// unfinished cycle in the pool.
    #[serde(default = "default_max_runahead_hours")]
    pub max_runahead_hours: u32,

    /// Where the runtime writes the state dump.
    #[serde(default = "default_state_dump")]
    pub state_dump: PathBuf,
}

fn default_max_runahead_hours() -> u32 {
    24
}

fn default_state_dump() -> PathBuf {
    PathBuf::from("cyclesched.state")
}

impl ConfigSection {
    pub fn new(initial_cycle: CycleTime) -> Self {
        Self {
            initial_cycle,
            final_cycle: None,
            max_runahead_hours: default_max_runahead_hours(),
            state_dump: default_state_dump(),
        }
    }
}

/// `[task.<name>]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct TaskConfig {
    /// Job script reference handed to the launcher.
    pub job: String,

    #[serde(default)]
    pub owner: Option<String>,

    #[serde(default)]
    pub abdication: AbdicationMode,

    /// Kind waits on an external real-world event and carries the shared
    /// catch-up flag.
    #[serde(default)]
    pub contact: bool,

    /// Set to `false` when later cycles consume this kind's outputs.
    #[serde(default = "default_quick_death")]
    pub quick_death: bool,

    pub valid_hours: Vec<u32>,

    #[serde(default)]
    pub prerequisites: Vec<String>,

    /// Defaults to "started" and "finished" outputs when empty.
    #[serde(default)]
    pub postrequisites: Vec<String>,

    /// Extra launch parameters.
    #[serde(default)]
    pub environment: BTreeMap<String, String>,
}

fn default_quick_death() -> bool {
    true
}

impl TaskConfig {
    pub fn new(job: impl Into<String>, valid_hours: Vec<u32>) -> Self {
        Self {
            job: job.into(),
            owner: None,
            abdication: AbdicationMode::default(),
            contact: false,
            quick_death: default_quick_death(),
            valid_hours,
            prerequisites: Vec::new(),
            postrequisites: Vec::new(),
            environment: BTreeMap::new(),
        }
    }
}
