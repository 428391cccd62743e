// src/config/mod.rs

//! Suite configuration.
//!
//! - TOML-backed data model (`model.rs`).
//! - Loading from disk (`loader.rs`).
//! - Validation into task kinds (`validate.rs`).

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{load_and_validate, load_from_path};
pub use model::{ConfigFile, ConfigSection, RawConfigFile, TaskConfig};
