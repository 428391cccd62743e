#![allow(dead_code)]

use std::collections::BTreeMap;
use std::path::PathBuf;

use cyclesched::config::{ConfigFile, ConfigSection, RawConfigFile, TaskConfig};
use cyclesched::cycle::CycleTime;
use cyclesched::errors::Result;
use cyclesched::types::AbdicationMode;

fn cycle(text: &str) -> CycleTime {
    CycleTime::parse(text).expect("builder given an invalid cycle time")
}

/// Builder for `ConfigFile` to simplify test setup.
pub struct ConfigFileBuilder {
    config: RawConfigFile,
}

impl ConfigFileBuilder {
    pub fn new(initial_cycle: &str) -> Self {
        Self {
            config: RawConfigFile {
                config: ConfigSection::new(cycle(initial_cycle)),
                task: BTreeMap::new(),
            },
        }
    }

    pub fn final_cycle(mut self, final_cycle: &str) -> Self {
        self.config.config.final_cycle = Some(cycle(final_cycle));
        self
    }

    pub fn max_runahead_hours(mut self, hours: u32) -> Self {
        self.config.config.max_runahead_hours = hours;
        self
    }

    pub fn state_dump(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.config.state_dump = path.into();
        self
    }

    pub fn with_task(mut self, name: &str, task: TaskConfig) -> Self {
        self.config.task.insert(name.to_string(), task);
        self
    }

    pub fn raw(self) -> RawConfigFile {
        self.config
    }

    pub fn try_build(self) -> Result<ConfigFile> {
        ConfigFile::try_from(self.config)
    }

    pub fn build(self) -> ConfigFile {
        ConfigFile::try_from(self.config).expect("Failed to build valid config from builder")
    }
}

/// Builder for `TaskConfig`. Valid hours default to `[0, 6, 12, 18]`.
pub struct TaskConfigBuilder {
    task: TaskConfig,
}

impl TaskConfigBuilder {
    pub fn new(job: &str) -> Self {
        Self {
            task: TaskConfig::new(job, vec![0, 6, 12, 18]),
        }
    }

    pub fn owner(mut self, owner: &str) -> Self {
        self.task.owner = Some(owner.to_string());
        self
    }

    pub fn abdication(mut self, mode: AbdicationMode) -> Self {
        self.task.abdication = mode;
        self
    }

    pub fn parallel(self) -> Self {
        self.abdication(AbdicationMode::Parallel)
    }

    pub fn contact(mut self, val: bool) -> Self {
        self.task.contact = val;
        self
    }

    pub fn quick_death(mut self, val: bool) -> Self {
        self.task.quick_death = val;
        self
    }

    pub fn valid_hours(mut self, hours: &[u32]) -> Self {
        self.task.valid_hours = hours.to_vec();
        self
    }

    pub fn prerequisite(mut self, template: &str) -> Self {
        self.task.prerequisites.push(template.to_string());
        self
    }

    pub fn postrequisite(mut self, template: &str) -> Self {
        self.task.postrequisites.push(template.to_string());
        self
    }

    pub fn env(mut self, key: &str, value: &str) -> Self {
        self.task.environment.insert(key.to_string(), value.to_string());
        self
    }

    pub fn build(self) -> TaskConfig {
        self.task
    }
}
