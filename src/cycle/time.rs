// src/cycle/time.rs

//! The cycle time: a calendar instant written as `YYYYMMDDHH`,
//! `YYYYMMDDHHmm` or `YYYYMMDDHHmmss`.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate, NaiveDateTime, TimeDelta, Timelike};
use serde::{Deserialize, Serialize};

use crate::errors::{Result, SchedulerError};

const FULL_FORMAT: &str = "%Y%m%d%H%M%S";

/// A validated cycle time.
///
/// Internally this is just the calendar instant; the canonical 14-digit text
/// and the other projections are derived on demand, so a `CycleTime` can
/// never hold text that disagrees with its instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CycleTime(NaiveDateTime);

impl CycleTime {
    /// Parse a 10, 12 or 14 digit cycle time.
    ///
    /// Shorter forms are zero-padded on minutes and seconds. Anything that
    /// does not land on a real proleptic Gregorian instant is rejected, with
    /// the formatted candidate embedded in the error.
    pub fn parse(text: &str) -> Result<Self> {
        let full = match text.len() {
            10 => format!("{text}0000"),
            12 => format!("{text}00"),
            14 => text.to_string(),
            _ => {
                return Err(SchedulerError::invalid_cycle(
                    "cycle times must be YYYYMMDDHH[mm[ss]]",
                    text,
                ));
            }
        };

        if !full.bytes().all(|b| b.is_ascii_digit()) {
            return Err(SchedulerError::invalid_cycle(
                "cycle times must contain digits only",
                text,
            ));
        }

        let formatted = format!(
            "{}/{}/{} {}:{}:{}",
            &full[0..4],
            &full[4..6],
            &full[6..8],
            &full[8..10],
            &full[10..12],
            &full[12..14]
        );

        let field = |start: usize, end: usize| -> u32 {
            full[start..end]
                .bytes()
                .fold(0, |acc, b| acc * 10 + u32::from(b - b'0'))
        };

        let (year, month, day) = (field(0, 4), field(4, 6), field(6, 8));
        let (hour, minute, second) = (field(8, 10), field(10, 12), field(12, 14));

        let reason = if year == 0 {
            Some("year is out of range")
        } else if !(1..=12).contains(&month) {
            Some("month must be in 1..12")
        } else if hour > 23 {
            Some("hour must be in 0..23")
        } else if minute > 59 {
            Some("minute must be in 0..59")
        } else if second > 59 {
            Some("second must be in 0..59")
        } else {
            None
        };
        if let Some(reason) = reason {
            return Err(SchedulerError::invalid_cycle(reason, formatted));
        }

        let dt = NaiveDate::from_ymd_opt(year as i32, month, day)
            .and_then(|d| d.and_hms_opt(hour, minute, second))
            .ok_or_else(|| {
                SchedulerError::invalid_cycle("day is out of range for month", formatted)
            })?;

        Ok(CycleTime(dt))
    }

    /// The truncated `YYYYMMDDHH` projection.
    pub fn to_hour_string(&self) -> String {
        self.0.format("%Y%m%d%H").to_string()
    }

    /// The canonical zero-padded `YYYYMMDDHHmmss` form.
    pub fn to_full_string(&self) -> String {
        self.0.format(FULL_FORMAT).to_string()
    }

    /// Human form, `YYYY/MM/DD HH:mm:ss`.
    pub fn formatted(&self) -> String {
        self.0.format("%Y/%m/%d %H:%M:%S").to_string()
    }

    pub fn datetime(&self) -> NaiveDateTime {
        self.0
    }

    pub fn year(&self) -> i32 {
        self.0.year()
    }

    pub fn month(&self) -> u32 {
        self.0.month()
    }

    pub fn day(&self) -> u32 {
        self.0.day()
    }

    pub fn hour(&self) -> u32 {
        self.0.hour()
    }

    pub fn minute(&self) -> u32 {
        self.0.minute()
    }

    pub fn second(&self) -> u32 {
        self.0.second()
    }

    /// Add a duration, re-validating the result through its canonical text.
    ///
    /// The duration is truncated toward zero to whole seconds before it is
    /// applied, so `decrement` exactly undoes `increment`.
    pub fn increment(&self, duration: CycleDuration) -> Result<Self> {
        let delta = duration.to_time_delta()?;
        let shifted = self
            .0
            .checked_add_signed(delta)
            .ok_or_else(|| SchedulerError::invalid_cycle("arithmetic overflow", self.formatted()))?;
        Self::parse(&shifted.format(FULL_FORMAT).to_string())
    }

    /// Subtract a duration; see [`CycleTime::increment`].
    pub fn decrement(&self, duration: CycleDuration) -> Result<Self> {
        let delta = duration.to_time_delta()?;
        let shifted = self
            .0
            .checked_sub_signed(delta)
            .ok_or_else(|| SchedulerError::invalid_cycle("arithmetic overflow", self.formatted()))?;
        Self::parse(&shifted.format(FULL_FORMAT).to_string())
    }

    /// Shorthand for `increment(CycleDuration::hours(hours))`; negative
    /// values step backwards.
    pub fn offset_hours(&self, hours: i64) -> Result<Self> {
        self.increment(CycleDuration::hours(hours))
    }

    /// Signed duration `self - other`.
    pub fn subtract(&self, other: &CycleTime) -> TimeDelta {
        self.0.signed_duration_since(other.0)
    }

    /// Whole hours in `self - other`, truncated toward zero.
    pub fn subtract_hours(&self, other: &CycleTime) -> i64 {
        self.subtract(other).num_hours()
    }
}

impl fmt::Display for CycleTime {
    /// Shortest canonical text: the 10 or 12 digit form when the trailing
    /// fields are zero, so the output always re-parses to the same instant.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let pattern = match (self.minute(), self.second()) {
            (0, 0) => "%Y%m%d%H",
            (_, 0) => "%Y%m%d%H%M",
            _ => FULL_FORMAT,
        };
        write!(f, "{}", self.0.format(pattern))
    }
}

impl FromStr for CycleTime {
    type Err = SchedulerError;

    fn from_str(s: &str) -> Result<Self> {
        CycleTime::parse(s)
    }
}

impl TryFrom<String> for CycleTime {
    type Error = SchedulerError;

    fn try_from(value: String) -> Result<Self> {
        CycleTime::parse(&value)
    }
}

impl From<CycleTime> for String {
    fn from(value: CycleTime) -> Self {
        value.to_string()
    }
}

/// A signed duration in the units cycle arithmetic supports.
///
/// Years and months are deliberately absent: their length depends on where
/// in the calendar you start.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CycleDuration {
    pub weeks: i64,
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
    pub milliseconds: i64,
    pub microseconds: i64,
}

impl CycleDuration {
    pub fn weeks(weeks: i64) -> Self {
        Self { weeks, ..Self::default() }
    }

    pub fn days(days: i64) -> Self {
        Self { days, ..Self::default() }
    }

    pub fn hours(hours: i64) -> Self {
        Self { hours, ..Self::default() }
    }

    pub fn minutes(minutes: i64) -> Self {
        Self { minutes, ..Self::default() }
    }

    pub fn seconds(seconds: i64) -> Self {
        Self { seconds, ..Self::default() }
    }

    pub fn with_minutes(mut self, minutes: i64) -> Self {
        self.minutes = minutes;
        self
    }

    pub fn with_seconds(mut self, seconds: i64) -> Self {
        self.seconds = seconds;
        self
    }

    pub fn with_milliseconds(mut self, milliseconds: i64) -> Self {
        self.milliseconds = milliseconds;
        self
    }

    pub fn with_microseconds(mut self, microseconds: i64) -> Self {
        self.microseconds = microseconds;
        self
    }

    /// Collapse all components into one chrono delta, truncated toward zero
    /// to whole seconds.
    pub fn to_time_delta(&self) -> Result<TimeDelta> {
        let parts = [
            TimeDelta::try_weeks(self.weeks),
            TimeDelta::try_days(self.days),
            TimeDelta::try_hours(self.hours),
            TimeDelta::try_minutes(self.minutes),
            TimeDelta::try_seconds(self.seconds),
            TimeDelta::try_milliseconds(self.milliseconds),
            Some(TimeDelta::microseconds(self.microseconds)),
        ];

        parts
            .into_iter()
            .try_fold(TimeDelta::zero(), |acc, part| acc.checked_add(&part?))
            .and_then(|total| TimeDelta::try_seconds(total.num_seconds()))
            .ok_or_else(|| {
                SchedulerError::invalid_cycle("duration out of range", format!("{self:?}"))
            })
    }
}
