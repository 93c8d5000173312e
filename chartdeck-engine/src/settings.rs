//! Analyzer-toggle persistence — JSON save/load across restarts.
//!
//! The store is deliberately forgiving on load: a missing or corrupt file
//! yields the defaults (all detectors on), matching how the original treated
//! its browser storage.

use std::path::{Path, PathBuf};

use chartdeck_client::AnalyzerToggles;

#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Per-user default location (`<config dir>/chartdeck/settings.json`).
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("chartdeck")
            .join("settings.json")
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load persisted toggles. Returns defaults if the file is missing or corrupt.
    pub fn load(&self) -> AnalyzerToggles {
        match std::fs::read_to_string(&self.path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_default(),
            Err(_) => AnalyzerToggles::default(),
        }
    }

    /// Save toggles to disk. Creates parent directories if needed.
    pub fn save(&self, toggles: &AnalyzerToggles) -> anyhow::Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(toggles)?;
        std::fs::write(&self.path, json)?;
        Ok(())
    }
}
