//! Persisted trigger state.
//!
//! Stored at `~/.config/fyso/triggers.json`: a map from trigger name to the
//! id of its active webhook subscription. Each trigger owns exactly one slot.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use super::config::LocalConfig;
use crate::api::{FysoError, SubscriptionSlot};

const STATE_FILE: &str = "triggers.json";

#[derive(Debug, Default, Serialize, Deserialize)]
struct TriggerState {
    #[serde(default)]
    subscriptions: BTreeMap<String, String>,
}

impl TriggerState {
    fn load(path: &Path) -> Result<Self, FysoError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    fn save(&self, path: &Path) -> Result<(), FysoError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }
}

/// One named trigger's slot in the state file.
///
/// Reads and writes go straight to disk, so nothing is cached between
/// activation and deactivation.
#[derive(Debug, Clone)]
pub struct FileSlot {
    path: PathBuf,
    name: String,
}

impl FileSlot {
    pub fn new(path: PathBuf, name: impl Into<String>) -> Self {
        Self {
            path,
            name: name.into(),
        }
    }

    /// Slot in the default state file.
    pub fn open(name: &str) -> Result<Self> {
        let path = LocalConfig::config_dir()
            .context("Could not locate trigger state")?
            .join(STATE_FILE);
        Ok(Self::new(path, name))
    }
}

impl SubscriptionSlot for FileSlot {
    fn get(&self) -> Result<Option<String>, FysoError> {
        Ok(TriggerState::load(&self.path)?.subscriptions.remove(&self.name))
    }

    fn set(&mut self, id: &str) -> Result<(), FysoError> {
        let mut state = TriggerState::load(&self.path)?;
        state.subscriptions.insert(self.name.clone(), id.to_string());
        state.save(&self.path)
    }

    fn clear(&mut self) -> Result<(), FysoError> {
        let mut state = TriggerState::load(&self.path)?;
        if state.subscriptions.remove(&self.name).is_some() {
            state.save(&self.path)?;
        }
        Ok(())
    }
}
