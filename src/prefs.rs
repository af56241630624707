//! Viewer preferences persisted between runs

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Persisted viewer preferences
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    pub dark_mode: bool,
}

impl Preferences {
    /// Load preferences, or defaults when the file is missing or unreadable
    pub fn load(path: &Path) -> Self {
        if let Ok(content) = fs::read_to_string(path) {
            match serde_json::from_str::<Preferences>(&content) {
                Ok(prefs) => return prefs,
                Err(e) => tracing::warn!("Ignoring unreadable preferences {:?}: {}", path, e),
            }
        }
        Self::default()
    }

    /// Save preferences to disk
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }
}

/// Preferences bound to the file they were read from
#[derive(Debug, Clone)]
pub struct PreferenceFile {
    path: PathBuf,
    prefs: Preferences,
}

impl PreferenceFile {
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let prefs = Preferences::load(&path);
        Self { path, prefs }
    }

    pub fn dark_mode(&self) -> bool {
        self.prefs.dark_mode
    }

    /// Set dark mode and write it out
    pub fn set_dark_mode(&mut self, enabled: bool) -> Result<()> {
        self.prefs.dark_mode = enabled;
        self.prefs.save(&self.path)?;
        tracing::debug!("Dark mode {}", if enabled { "on" } else { "off" });
        Ok(())
    }

    /// Flip dark mode and write it out, returning the new value
    pub fn toggle_dark_mode(&mut self) -> Result<bool> {
        let enabled = !self.prefs.dark_mode;
        self.set_dark_mode(enabled)?;
        Ok(enabled)
    }
}
