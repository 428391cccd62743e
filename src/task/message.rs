// src/task/message.rs

//! Classification of incoming task messages.
//!
//! Every message is resolved once against a fixed table, in this order:
//! an outstanding postrequisite label, the kind's failure sentinel, a
//! contact catch-up signal, otherwise a plain progress note. The early
//! abdication sentinel is checked independently because a kind may also
//! declare that text as one of its outputs.

use std::sync::LazyLock;

use regex::Regex;

use crate::cycle::CycleTime;
use crate::task::policy::CatchUpSignal;
use crate::task::requisites::RequisiteSet;

static ENDS_WITH_CYCLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"for \d{10}(?:\d{2}){0,2}$").expect("cycle suffix regex is valid"));

/// Sentinel texts for one instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sentinels {
    pub failed: String,
    pub ready_to_abdicate: String,
}

impl Sentinels {
    pub fn new(kind: &str, cycle: CycleTime) -> Self {
        Self {
            failed: format!("{kind} failed for {cycle}"),
            ready_to_abdicate: format!("{kind} ready to abdicate for {cycle}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    /// Matches a postrequisite label; `already_satisfied` marks a repeat.
    Postrequisite { already_satisfied: bool },
    Failure,
    CatchUp(CatchUpSignal),
    Progress,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageMatch {
    pub kind: MessageKind,
    /// The message is this instance's early abdication notice.
    pub abdication_notice: bool,
}

/// Resolve `message` for an instance with the given outputs and sentinels.
/// Catch-up signals are only recognised for contact kinds.
pub fn classify(
    message: &str,
    postrequisites: &RequisiteSet,
    sentinels: &Sentinels,
    contact: bool,
) -> MessageMatch {
    let kind = if postrequisites.exists(message) {
        MessageKind::Postrequisite {
            already_satisfied: postrequisites.is_satisfied(message),
        }
    } else if message == sentinels.failed {
        MessageKind::Failure
    } else if let Some(signal) = contact.then(|| CatchUpSignal::from_message(message)).flatten() {
        MessageKind::CatchUp(signal)
    } else {
        MessageKind::Progress
    };

    MessageMatch {
        kind,
        abdication_notice: message == sentinels.ready_to_abdicate,
    }
}

/// Log text for an incoming message: tagged `(INCOMING)` and always ending
/// in the cycle it belongs to.
pub fn incoming_log_text(message: &str, cycle: CycleTime) -> String {
    if ENDS_WITH_CYCLE.is_match(message) {
        format!("(INCOMING) {message}")
    } else {
        format!("(INCOMING) {message}; for {cycle}")
    }
}
