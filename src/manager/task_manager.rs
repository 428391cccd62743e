// src/manager/task_manager.rs

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::config::model::ConfigFile;
use crate::cycle::CycleTime;
use crate::errors::{Result, SchedulerError};
use crate::manager::manager_step::ManagerStep;
use crate::manager::retention;
use crate::state::{render_state_dump, StateRecord};
use crate::task::{
    InitialState, LaunchRequest, RelativeState, RequisiteSet, StateChange, Task, TaskContext,
    TaskId, TaskKind, TaskSummary,
};
use crate::types::Priority;

/// Owns the live instance pool and everything instances share.
///
/// It is responsible for:
/// - creating instances at cold start, at restart and on abdication
/// - routing incoming messages to the right instance
/// - matching outputs to prerequisites across the pool
/// - deciding which ready instances launch (bounded by the runahead limit)
/// - deleting spent instances once nothing needs them
#[derive(Debug)]
pub struct TaskManager {
    kinds: BTreeMap<String, Arc<TaskKind>>,
    final_cycle: Option<CycleTime>,
    max_runahead_hours: u32,
    pool: BTreeMap<TaskId, Task>,
    ctx: TaskContext,
}

impl TaskManager {
    fn empty(cfg: &ConfigFile, history_start: CycleTime) -> Self {
        Self {
            kinds: cfg
                .kinds()
                .map(|kind| (kind.name.clone(), Arc::clone(kind)))
                .collect(),
            final_cycle: cfg.config.final_cycle,
            max_runahead_hours: cfg.config.max_runahead_hours,
            pool: BTreeMap::new(),
            ctx: TaskContext::new(Some(history_start)),
        }
    }

    /// One waiting instance per kind at its first valid cycle on or after
    /// the suite's initial cycle.
    pub fn cold_start(cfg: &ConfigFile) -> Result<Self> {
        let initial = cfg.config.initial_cycle;
        let mut manager = Self::empty(cfg, initial);

        for kind in cfg.kinds() {
            let cycle = kind.valid_hours.nearest(initial)?;
            if manager.beyond_final(cycle) {
                info!(kind = %kind.name, %cycle, "first valid cycle is past the final cycle; not creating");
                continue;
            }
            manager.insert(Arc::clone(kind), cycle, false, InitialState::Waiting, None)?;
        }

        info!(%initial, tasks = manager.pool.len(), "cold start");
        Ok(manager)
    }

    /// Rebuild the pool from state dump records.
    ///
    /// Prerequisites referring to cycles older than the oldest record are
    /// treated as satisfied.
    pub fn restart(cfg: &ConfigFile, records: Vec<StateRecord>) -> Result<Self> {
        let history_start = records
            .iter()
            .map(|r| r.cycle)
            .min()
            .unwrap_or(cfg.config.initial_cycle);
        let mut manager = Self::empty(cfg, history_start);

        for record in records {
            let kind = manager
                .kinds
                .get(&record.kind)
                .cloned()
                .ok_or_else(|| SchedulerError::UnknownTask(record.kind.clone()))?;

            let id = TaskId::new(record.kind.clone(), record.cycle);
            if manager.pool.contains_key(&id) {
                warn!(task = %id, "duplicate state record; keeping the first");
                continue;
            }
            if !kind.valid_hours.contains(record.cycle.hour()) {
                warn!(task = %id, "restored cycle is not one of the kind's valid hours");
            }

            manager.insert(
                kind,
                record.cycle,
                record.abdicated,
                record.state,
                record.relative,
            )?;
        }

        for name in manager.kinds.keys() {
            if manager.ctx.kinds.instance_count(name) == 0 {
                warn!(kind = %name, "no instances of this kind in the state dump");
            }
        }

        info!(%history_start, tasks = manager.pool.len(), "restart from state dump");
        Ok(manager)
    }

    fn insert(
        &mut self,
        kind: Arc<TaskKind>,
        cycle: CycleTime,
        abdicated: bool,
        initial: InitialState,
        relative: Option<RelativeState>,
    ) -> Result<TaskId> {
        let task = Task::new(kind, cycle, abdicated, initial, relative, &mut self.ctx)?;
        let id = task.id().clone();
        self.pool.insert(id.clone(), task);
        Ok(id)
    }

    fn beyond_final(&self, cycle: CycleTime) -> bool {
        self.final_cycle.is_some_and(|last| cycle > last)
    }

    /// Deliver one message. Returns `false` if no live instance has `id`.
    pub fn handle_message(&mut self, id: &TaskId, priority: Priority, message: &str) -> bool {
        match self.pool.get_mut(id) {
            Some(task) => {
                task.incoming(priority, message, &mut self.ctx);
                true
            }
            None => {
                warn!(task = %id, %priority, text = message, "message for unknown task; ignoring");
                false
            }
        }
    }

    /// Advance the pool until nothing more launches or spawns, then collect
    /// garbage.
    pub fn step(&mut self) -> Result<ManagerStep> {
        let mut result = ManagerStep::default();

        loop {
            self.negotiate();
            let launched = self.launch_ready()?;
            let spawned = self.abdicate_and_spawn()?;

            let progressed = !launched.is_empty() || !spawned.is_empty();
            result.launched.extend(launched);
            result.spawned.extend(spawned);
            if !progressed {
                break;
            }
        }

        result.removed = self.collect_garbage();
        Ok(result)
    }

    /// Satisfy waiting instances from every output already produced.
    fn negotiate(&mut self) {
        let mut outputs = RequisiteSet::new();
        for task in self.pool.values() {
            for label in task.postrequisites().satisfied_labels() {
                if outputs.add(label) {
                    outputs.satisfy(label);
                }
            }
        }

        for task in self.pool.values_mut().filter(|t| t.is_waiting()) {
            task.get_satisfaction(&outputs, &mut self.ctx);
        }
    }

    /// Oldest cycle with an instance that has not finished.
    fn oldest_unfinished(&self) -> Option<CycleTime> {
        self.pool
            .values()
            .find(|task| !task.is_finished())
            .map(Task::cycle)
    }

    fn launch_ready(&mut self) -> Result<Vec<LaunchRequest>> {
        let Some(oldest) = self.oldest_unfinished() else {
            return Ok(Vec::new());
        };
        let limit = oldest.offset_hours(i64::from(self.max_runahead_hours))?;

        let mut launched = Vec::new();
        for task in self.pool.values_mut() {
            if task.cycle() > limit {
                break;
            }
            if let Some(request) = task.run_if_ready(&mut self.ctx) {
                info!(task = %task.id(), "launching");
                launched.push(request);
            }
        }
        Ok(launched)
    }

    fn abdicate_and_spawn(&mut self) -> Result<Vec<TaskId>> {
        let mut successors = Vec::new();
        for task in self.pool.values_mut() {
            if task.abdicate(&mut self.ctx) {
                successors.push((Arc::clone(task.kind()), task.next_cycle()?));
            }
        }

        let mut spawned = Vec::new();
        for (kind, cycle) in successors {
            let id = TaskId::new(kind.name.clone(), cycle);
            if self.beyond_final(cycle) {
                debug!(task = %id, "successor is past the final cycle; not creating");
                continue;
            }
            if self.pool.contains_key(&id) {
                debug!(task = %id, "successor already live");
                continue;
            }
            info!(task = %id, "spawning successor");
            spawned.push(self.insert(kind, cycle, false, InitialState::Waiting, None)?);
        }
        Ok(spawned)
    }

    fn collect_garbage(&mut self) -> Vec<TaskId> {
        let spent = retention::spent_tasks(&self.pool);
        for id in &spent {
            if let Some(task) = self.pool.remove(id) {
                task.prepare_for_death(&mut self.ctx);
                info!(task = %id, "removing spent task");
            }
        }
        spent
    }

    /// Oldest cycle the pool currently has to keep.
    pub fn global_cutoff(&self) -> Option<CycleTime> {
        retention::global_cutoff(self.pool.values())
    }

    /// All live instances as state records, sorted by cycle then kind.
    pub fn records(&self) -> Vec<StateRecord> {
        self.pool
            .values()
            .map(|task| task.to_record(&self.ctx.kinds))
            .collect()
    }

    pub fn dump_state(&self) -> String {
        render_state_dump(&self.records())
    }

    /// The final cycle is set and every live instance is finished and
    /// abdicated (or none are left).
    pub fn suite_complete(&self) -> bool {
        self.final_cycle.is_some()
            && self
                .pool
                .values()
                .all(|task| task.is_finished() && task.has_abdicated())
    }

    pub fn summaries(&self) -> Vec<TaskSummary> {
        self.pool
            .values()
            .map(|task| task.summary(&self.ctx.kinds))
            .collect()
    }

    pub fn task(&self, id: &TaskId) -> Option<&Task> {
        self.pool.get(id)
    }

    pub fn tasks(&self) -> impl Iterator<Item = &Task> {
        self.pool.values()
    }

    pub fn len(&self) -> usize {
        self.pool.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pool.is_empty()
    }

    pub fn context(&self) -> &TaskContext {
        &self.ctx
    }

    pub fn has_changed(&self) -> bool {
        self.ctx.changes.has_changed()
    }

    /// Changes since the last call; resets the tracker.
    pub fn take_changes(&mut self) -> Vec<(TaskId, StateChange)> {
        self.ctx.changes.take()
    }
}
