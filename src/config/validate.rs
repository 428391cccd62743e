// src/config/validate.rs

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use petgraph::algo::toposort;
use petgraph::graphmap::DiGraphMap;

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::{Result, SchedulerError};
use crate::task::TaskKind;

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = crate::errors::SchedulerError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        let kinds = validate_raw_config(&raw)?;
        Ok(ConfigFile::new_unchecked(raw.config, raw.task, kinds))
    }
}

fn validate_raw_config(cfg: &RawConfigFile) -> Result<BTreeMap<String, Arc<TaskKind>>> {
    ensure_has_tasks(cfg)?;
    validate_global_config(cfg)?;
    let kinds = build_kinds(cfg)?;
    let edges = validate_task_dependencies(&kinds)?;
    validate_same_cycle_graph(&kinds, &edges)?;
    Ok(kinds)
}

fn ensure_has_tasks(cfg: &RawConfigFile) -> Result<()> {
    if cfg.task.is_empty() {
        return Err(SchedulerError::ConfigError(
            "config must contain at least one [task.<name>] section".to_string(),
        ));
    }
    Ok(())
}

fn validate_global_config(cfg: &RawConfigFile) -> Result<()> {
    if let Some(final_cycle) = cfg.config.final_cycle {
        if final_cycle < cfg.config.initial_cycle {
            return Err(SchedulerError::ConfigError(format!(
                "[config].final_cycle ({final_cycle}) is before initial_cycle ({})",
                cfg.config.initial_cycle
            )));
        }
    }
    Ok(())
}

fn build_kinds(cfg: &RawConfigFile) -> Result<BTreeMap<String, Arc<TaskKind>>> {
    cfg.task
        .iter()
        .map(|(name, task)| Ok((name.clone(), Arc::new(TaskKind::from_config(name, task)?))))
        .collect()
}

/// One dependency between kinds: `consumer` needs an output of `producer`
/// from `offset` hours relative to its own cycle.
struct DependencyEdge<'a> {
    producer: &'a str,
    consumer: &'a str,
    offset: i64,
}

fn validate_task_dependencies(
    kinds: &BTreeMap<String, Arc<TaskKind>>,
) -> Result<Vec<DependencyEdge<'_>>> {
    // Normalized output text -> kinds producing it.
    let mut producers: HashMap<String, Vec<&str>> = HashMap::new();
    for (name, kind) in kinds {
        for template in &kind.postrequisites {
            let (text, _) = template.normalized(name);
            producers.entry(text).or_default().push(name.as_str());
        }
    }

    let mut edges = Vec::new();
    for (name, kind) in kinds {
        for template in &kind.prerequisites {
            let (text, offset) = template.normalized(name);
            let Some(found) = producers.get(&text) else {
                return Err(SchedulerError::ConfigError(format!(
                    "task '{name}' has unknown dependency '{}': no task lists it as a postrequisite",
                    template.raw()
                )));
            };

            for producer in found {
                if offset < 0 && kinds[*producer].quick_death {
                    return Err(SchedulerError::ConfigError(format!(
                        "task '{producer}' must set quick_death = false: task '{name}' needs its \
                         output from an earlier cycle ('{}')",
                        template.raw()
                    )));
                }
                edges.push(DependencyEdge {
                    producer,
                    consumer: name.as_str(),
                    offset,
                });
            }
        }
    }
    Ok(edges)
}

fn validate_same_cycle_graph(
    kinds: &BTreeMap<String, Arc<TaskKind>>,
    edges: &[DependencyEdge<'_>],
) -> Result<()> {
    // Edge direction: producer -> consumer, same-cycle dependencies only.
    // Offsets let a kind depend on itself across cycles; at offset 0 it
    // would wait on itself forever.
    let mut graph: DiGraphMap<&str, ()> = DiGraphMap::new();

    for name in kinds.keys() {
        graph.add_node(name.as_str());
    }

    for edge in edges.iter().filter(|e| e.offset == 0) {
        if edge.producer == edge.consumer {
            return Err(SchedulerError::DependencyCycle(format!(
                "task '{}' depends on its own output at the same cycle",
                edge.consumer
            )));
        }
        graph.add_edge(edge.producer, edge.consumer, ());
    }

    match toposort(&graph, None) {
        Ok(_order) => Ok(()),
        Err(cycle) => Err(SchedulerError::DependencyCycle(format!(
            "cycle detected in same-cycle task dependencies involving task '{}'",
            cycle.node_id()
        ))),
    }
}
