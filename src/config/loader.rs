// src/config/loader.rs

use std::fs;
use std::path::Path;

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::Result;

/// Load a suite file from a given path and return the raw `RawConfigFile`.
///
/// This only performs TOML deserialization (which already rejects malformed
/// cycle times); use [`load_and_validate`] for the semantic checks.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawConfigFile> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;

    let config: RawConfigFile = toml::from_str(&contents)?;

    Ok(config)
}

/// Load a suite file from path and validate it.
///
/// - Reads TOML.
/// - Applies defaults (handled by `serde` default functions).
/// - Builds every task kind and checks for:
///   - bad valid hours and requisite templates,
///   - prerequisites no kind produces,
///   - same-cycle dependency cycles,
///   - quick-death kinds whose outputs are needed by later cycles.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<ConfigFile> {
    let raw_config = load_from_path(&path)?;
    let config = ConfigFile::try_from(raw_config)?;
    Ok(config)
}
