// src/cycle/hours.rs

use crate::cycle::time::{CycleDuration, CycleTime};
use crate::errors::{Result, SchedulerError};

/// The ordered hours of the day at which a task kind may run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidHours(Vec<u32>);

impl ValidHours {
    /// Build from any order of hours; rejects an empty set, duplicates and
    /// anything outside `0..=23`.
    pub fn new(hours: impl IntoIterator<Item = u32>) -> Result<Self> {
        let mut hours: Vec<u32> = hours.into_iter().collect();
        if hours.is_empty() {
            return Err(SchedulerError::ConfigError(
                "valid_hours must list at least one hour".to_string(),
            ));
        }
        if let Some(bad) = hours.iter().find(|h| **h > 23) {
            return Err(SchedulerError::ConfigError(format!(
                "valid hour {bad} is outside 0..=23"
            )));
        }

        hours.sort_unstable();
        let before = hours.len();
        hours.dedup();
        if hours.len() != before {
            return Err(SchedulerError::ConfigError(
                "valid_hours contains duplicates".to_string(),
            ));
        }

        Ok(Self(hours))
    }

    pub fn hours(&self) -> &[u32] {
        &self.0
    }

    pub fn contains(&self, hour: u32) -> bool {
        self.0.binary_search(&hour).is_ok()
    }

    /// Valid hours followed by "first valid hour tomorrow", so a search for
    /// the next hour always finds something.
    fn with_wraparound(&self) -> impl Iterator<Item = u32> + '_ {
        self.0.iter().copied().chain(std::iter::once(self.0[0] + 24))
    }

    /// Earliest valid cycle at or after `from`.
    pub fn nearest(&self, from: CycleTime) -> Result<CycleTime> {
        let current = from.hour();
        let target = self
            .with_wraparound()
            .find(|vh| *vh >= current)
            .unwrap_or(self.0[0] + 24);
        from.increment(CycleDuration::hours(i64::from(target - current)))
    }

    /// The valid cycle after `from`.
    ///
    /// From a valid hour this is the gap to the following valid hour, or
    /// `(first + 24) - current` across midnight. From an hour that is not
    /// valid it is the next valid hour strictly later.
    pub fn next(&self, from: CycleTime) -> Result<CycleTime> {
        let current = from.hour();
        let target = self
            .with_wraparound()
            .find(|vh| *vh > current)
            .unwrap_or(self.0[0] + 24);
        from.increment(CycleDuration::hours(i64::from(target - current)))
    }
}
