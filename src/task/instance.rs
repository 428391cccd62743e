// src/task/instance.rs

//! One task instance: one kind at one cycle.

use std::sync::Arc;

use tracing::{debug, error, info, warn};

use crate::cycle::CycleTime;
use crate::errors::Result;
use crate::state::StateRecord;
use crate::task::context::{KindRegistry, StateChange, TaskContext};
use crate::task::kind::{LaunchRequest, TaskKind};
use crate::task::message::{classify, incoming_log_text, MessageKind, Sentinels};
use crate::task::requisites::RequisiteSet;
use crate::task::state::{InitialState, RelativeState, TaskId, TaskState};
use crate::types::Priority;

/// Read-only snapshot of an instance for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskSummary {
    pub name: String,
    pub cycle: CycleTime,
    pub state: TaskState,
    pub n_total_postrequisites: usize,
    pub n_completed_postrequisites: usize,
    pub abdicated: bool,
    pub latest_message: String,
    /// Only present for contact kinds.
    pub catching_up: Option<bool>,
}

/// A live task instance.
///
/// Created and destroyed only by the manager. Every mutating operation
/// takes the manager's [`TaskContext`] so per-kind state and change
/// tracking stay explicit.
#[derive(Debug, Clone)]
pub struct Task {
    kind: Arc<TaskKind>,
    id: TaskId,
    sentinels: Sentinels,
    state: TaskState,
    prerequisites: RequisiteSet,
    postrequisites: RequisiteSet,
    abdicated: bool,
    received_abdication_notice: bool,
    latest_message: String,
}

impl Task {
    /// Construct an instance. Cold start, successor spawning and restart all
    /// come through here; only restart passes anything but
    /// `(false, Waiting, None)` for the last three state arguments.
    pub fn new(
        kind: Arc<TaskKind>,
        cycle: CycleTime,
        abdicated: bool,
        initial: InitialState,
        relative: Option<RelativeState>,
        ctx: &mut TaskContext,
    ) -> Result<Self> {
        let id = TaskId::new(kind.name.clone(), cycle);
        let mut prerequisites = kind.render_prerequisites(cycle, ctx.history_start)?;
        let mut postrequisites = kind.render_postrequisites(cycle)?;

        let kind_state = ctx.kinds.entry(&kind.name);
        match (&kind.contact, relative) {
            (Some(contact), relative) => {
                contact.register(kind_state);
                if let Some(relative) = relative {
                    kind_state.catching_up = Some(relative.is_catching_up());
                }
            }
            (None, Some(relative)) => {
                warn!(task = %id, %relative, "catch-up state given for a non-contact kind; ignoring");
            }
            (None, None) => {}
        }
        kind_state.instance_count += 1;

        let state = match initial {
            InitialState::Waiting => TaskState::Waiting,
            InitialState::Ready => {
                warn!(task = %id, "starting in READY state");
                prerequisites.set_all_satisfied();
                TaskState::Waiting
            }
            InitialState::Running => {
                warn!(task = %id, "was running when state was saved; will relaunch");
                prerequisites.set_all_satisfied();
                TaskState::Waiting
            }
            InitialState::Finished => {
                warn!(task = %id, "starting in FINISHED state");
                postrequisites.set_all_satisfied();
                TaskState::Finished
            }
            InitialState::Failed => {
                warn!(task = %id, "starting in FAILED state");
                TaskState::Failed
            }
        };

        ctx.changes.record(&id, StateChange::Created);
        debug!(task = %id, %initial, abdicated, "created task");

        Ok(Self {
            sentinels: Sentinels::new(&kind.name, cycle),
            kind,
            id,
            state,
            prerequisites,
            postrequisites,
            abdicated,
            received_abdication_notice: false,
            latest_message: String::new(),
        })
    }

    pub fn id(&self) -> &TaskId {
        &self.id
    }

    pub fn kind(&self) -> &Arc<TaskKind> {
        &self.kind
    }

    pub fn name(&self) -> &str {
        &self.kind.name
    }

    pub fn cycle(&self) -> CycleTime {
        self.id.cycle
    }

    pub fn state(&self) -> TaskState {
        self.state
    }

    pub fn is_waiting(&self) -> bool {
        self.state == TaskState::Waiting
    }

    pub fn is_running(&self) -> bool {
        self.state == TaskState::Running
    }

    pub fn is_finished(&self) -> bool {
        self.state == TaskState::Finished
    }

    pub fn is_failed(&self) -> bool {
        self.state == TaskState::Failed
    }

    pub fn has_abdicated(&self) -> bool {
        self.abdicated
    }

    pub fn received_abdication_notice(&self) -> bool {
        self.received_abdication_notice
    }

    pub fn latest_message(&self) -> &str {
        &self.latest_message
    }

    pub fn prerequisites(&self) -> &RequisiteSet {
        &self.prerequisites
    }

    pub fn postrequisites(&self) -> &RequisiteSet {
        &self.postrequisites
    }

    pub fn sentinels(&self) -> &Sentinels {
        &self.sentinels
    }

    /// Satisfy prerequisites from another instance's (or a merged) output
    /// set. Returns how many were newly satisfied.
    pub fn get_satisfaction(&mut self, outputs: &RequisiteSet, ctx: &mut TaskContext) -> usize {
        let newly = self.prerequisites.satisfy_from(outputs);
        if newly > 0 {
            debug!(task = %self.id, newly, "prerequisites satisfied");
            ctx.changes.record(&self.id, StateChange::PrerequisitesSatisfied);
        }
        newly
    }

    /// Would these outputs make this instance ready? Never mutates.
    pub fn will_get_satisfaction<'a, I>(&self, sources: I) -> bool
    where
        I: IntoIterator<Item = &'a RequisiteSet>,
    {
        self.prerequisites.would_satisfy_from(sources)
    }

    /// If waiting with every prerequisite satisfied, move to `Running` and
    /// return what the launcher needs.
    pub fn run_if_ready(&mut self, ctx: &mut TaskContext) -> Option<LaunchRequest> {
        if self.state == TaskState::Waiting && self.prerequisites.all_satisfied() {
            Some(self.run_external_task(ctx))
        } else {
            None
        }
    }

    fn run_external_task(&mut self, ctx: &mut TaskContext) -> LaunchRequest {
        debug!(task = %self.id, job = %self.kind.job, "launching task");
        self.state = TaskState::Running;
        ctx.changes.record(&self.id, StateChange::Launched);
        LaunchRequest::from_kind(&self.kind, self.id.cycle)
    }

    /// Process one incoming message.
    ///
    /// Nothing here is an error: messages in the wrong state and repeated
    /// outputs are logged as anomalies and processing carries on.
    pub fn incoming(&mut self, priority: Priority, message: &str, ctx: &mut TaskContext) {
        ctx.changes.record(&self.id, StateChange::Message);
        self.latest_message = message.to_string();

        let matched = classify(
            message,
            &self.postrequisites,
            &self.sentinels,
            self.kind.is_contact(),
        );
        let log_message = incoming_log_text(message, self.id.cycle);

        if matched.abdication_notice {
            debug!(task = %self.id, "early abdication ok");
            self.received_abdication_notice = true;
        }

        if self.state != TaskState::Running {
            warn!(task = %self.id, state = %self.state, "MESSAGE FROM NON-RUNNING TASK: {log_message}");
        }

        match matched.kind {
            MessageKind::Postrequisite { already_satisfied } => {
                if already_satisfied {
                    warn!(task = %self.id, "POSTREQUISITE ALREADY SATISFIED: {log_message}");
                }
                info!(task = %self.id, "{log_message}");
                self.postrequisites.satisfy(message);
            }
            MessageKind::Failure => {
                error!(task = %self.id, "{log_message}");
                self.state = TaskState::Failed;
                ctx.changes.record(&self.id, StateChange::Failed);
            }
            MessageKind::CatchUp(signal) => {
                log_progress(&self.id, priority, &log_message);
                if let Some(contact) = &self.kind.contact {
                    let kind_state = ctx.kinds.entry(&self.kind.name);
                    if contact.apply(&self.id, signal, kind_state) {
                        ctx.changes.record(&self.id, StateChange::CatchUpChanged);
                    }
                }
            }
            MessageKind::Progress => log_progress(&self.id, priority, &log_message),
        }

        if self.postrequisites.all_satisfied() && self.state != TaskState::Finished {
            self.state = TaskState::Finished;
            ctx.kinds.entry(&self.kind.name).last_finished = Some(self.id.cycle);
            ctx.changes.record(&self.id, StateChange::Finished);
            debug!(task = %self.id, "all postrequisites satisfied; finished");
        }
    }

    /// Whether this kind's policy lets the successor be created now.
    pub fn ready_to_abdicate(&self) -> bool {
        self.kind
            .policy()
            .ready_to_abdicate(self.state, self.received_abdication_notice)
    }

    /// Abdicate at most once. `true` means the manager should now create
    /// the successor; every later call returns `false` and changes nothing.
    pub fn abdicate(&mut self, ctx: &mut TaskContext) -> bool {
        if self.abdicated || !self.ready_to_abdicate() {
            return false;
        }
        self.abdicated = true;
        ctx.kinds.entry(&self.kind.name).last_abdicated = Some(self.id.cycle);
        ctx.changes.record(&self.id, StateChange::Abdicated);
        debug!(task = %self.id, "abdicated");
        true
    }

    /// Oldest cycle that must be kept for this instance's prerequisites or
    /// those of its not-yet-created successor. `None` means no constraint.
    ///
    /// Unabdicated running or finished instances answer with their own
    /// cycle, which is never later than the true answer. Failed instances
    /// hold nothing back.
    pub fn cutoff(&self) -> Option<CycleTime> {
        match self.state {
            TaskState::Waiting => Some(self.id.cycle),
            TaskState::Running | TaskState::Finished if !self.abdicated => Some(self.id.cycle),
            _ => None,
        }
    }

    /// Cycle of this kind's next valid instance.
    pub fn next_cycle(&self) -> Result<CycleTime> {
        self.kind.valid_hours.next(self.id.cycle)
    }

    /// State as written to the dump: `state`, or `state:relative` for
    /// contact kinds.
    pub fn state_string(&self, kinds: &KindRegistry) -> String {
        match self.relative_state(kinds) {
            Some(relative) => format!("{}:{}", self.state, relative),
            None => self.state.to_string(),
        }
    }

    fn relative_state(&self, kinds: &KindRegistry) -> Option<RelativeState> {
        let contact = self.kind.contact.as_ref()?;
        let kind_state = kinds.get(&self.kind.name).cloned().unwrap_or_default();
        Some(contact.relative_state(&kind_state))
    }

    pub fn to_record(&self, kinds: &KindRegistry) -> StateRecord {
        StateRecord {
            cycle: self.id.cycle,
            kind: self.kind.name.clone(),
            abdicated: self.abdicated,
            state: self.state.into(),
            relative: self.relative_state(kinds),
        }
    }

    pub fn summary(&self, kinds: &KindRegistry) -> TaskSummary {
        TaskSummary {
            name: self.kind.name.clone(),
            cycle: self.id.cycle,
            state: self.state,
            n_total_postrequisites: self.postrequisites.len(),
            n_completed_postrequisites: self.postrequisites.satisfied_count(),
            abdicated: self.abdicated,
            latest_message: self.latest_message.clone(),
            catching_up: self
                .relative_state(kinds)
                .map(|relative| relative.is_catching_up()),
        }
    }

    /// Must be called by the manager right before it drops the instance.
    pub fn prepare_for_death(&self, ctx: &mut TaskContext) {
        let kind_state = ctx.kinds.entry(&self.kind.name);
        kind_state.instance_count = kind_state.instance_count.saturating_sub(1);
        ctx.changes.record(&self.id, StateChange::Removed);
    }
}

fn log_progress(id: &TaskId, priority: Priority, log_message: &str) {
    match priority {
        Priority::Normal => info!(task = %id, "*{log_message}"),
        Priority::Warning => warn!(task = %id, "*{log_message}"),
        Priority::Critical => error!(task = %id, "*{log_message}"),
    }
}
