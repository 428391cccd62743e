// src/state/store.rs

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use tracing::debug;

use crate::errors::Result;
use crate::fs::FileSystem;
use crate::state::record::{parse_state_dump, StateRecord};

/// Reads and writes the state dump through the filesystem abstraction.
#[derive(Debug, Clone)]
pub struct StateStore {
    fs: Arc<dyn FileSystem>,
    path: PathBuf,
}

impl StateStore {
    pub fn new(fs: Arc<dyn FileSystem>, path: impl Into<PathBuf>) -> Self {
        Self {
            fs,
            path: path.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.fs.exists(&self.path)
    }

    pub fn load(&self) -> Result<Vec<StateRecord>> {
        if !self.exists() {
            return Err(
                anyhow::anyhow!("no state dump at {:?}; start without --restart", self.path).into(),
            );
        }
        let text = self
            .fs
            .read_to_string(&self.path)
            .with_context(|| format!("loading state dump {:?}", self.path))?;
        let records = parse_state_dump(&text)?;
        debug!(path = ?self.path, records = records.len(), "loaded state dump");
        Ok(records)
    }

    /// Write already rendered dump text.
    pub fn save(&self, text: &str) -> Result<()> {
        self.fs
            .write(&self.path, text.as_bytes())
            .with_context(|| format!("writing state dump {:?}", self.path))?;
        debug!(path = ?self.path, "wrote state dump");
        Ok(())
    }
}
