// src/cycle/mod.rs

//! Cycle-time arithmetic.
//!
//! - [`time`] parses and validates the `YYYYMMDDHH[mm[ss]]` scheduling
//!   coordinate and does exact calendar arithmetic on it.
//! - [`hours`] steps a cycle time through a kind's valid hours of the day.

pub mod hours;
pub mod time;

pub use hours::ValidHours;
pub use time::{CycleDuration, CycleTime};
