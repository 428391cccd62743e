// src/state/mod.rs

//! State dump records and their persistence.

pub mod record;
pub mod store;

pub use record::{parse_state_dump, render_state_dump, StateRecord};
pub use store::StateStore;
