// src/manager/retention.rs

//! Which spent instances the pool can drop.
//!
//! Only finished, abdicated instances are ever candidates. A quick-death
//! kind goes as soon as no other instance at an equal or older cycle is
//! still waiting or unabdicated. Every other kind is kept until its cycle
//! falls strictly behind the global cutoff.

use std::collections::BTreeMap;

use crate::cycle::CycleTime;
use crate::task::{Task, TaskId};

/// Oldest cycle any live instance still pins, or `None` if nothing does.
pub fn global_cutoff<'a>(tasks: impl IntoIterator<Item = &'a Task>) -> Option<CycleTime> {
    tasks.into_iter().filter_map(Task::cutoff).min()
}

/// Ids of instances that can be deleted right now, oldest first.
pub fn spent_tasks(pool: &BTreeMap<TaskId, Task>) -> Vec<TaskId> {
    let cutoff = global_cutoff(pool.values());

    pool.values()
        .filter(|task| task.is_finished() && task.has_abdicated())
        .filter(|task| {
            if task.kind().quick_death {
                !pinned_by_older(pool, task)
            } else {
                cutoff.is_none_or(|cutoff| task.cycle() < cutoff)
            }
        })
        .map(|task| task.id().clone())
        .collect()
}

/// Is another instance at this cycle or older still waiting or unabdicated?
fn pinned_by_older(pool: &BTreeMap<TaskId, Task>, task: &Task) -> bool {
    pool.values()
        .take_while(|other| other.cycle() <= task.cycle())
        .filter(|other| other.id() != task.id())
        .any(|other| other.is_waiting() || !other.has_abdicated())
}
