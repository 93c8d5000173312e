//! Engine configuration — TOML file with CLI-friendly defaults.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Startup parameters for the watch loop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Backend base URL, no trailing slash.
    pub base_url: String,
    /// Initial session symbol.
    pub symbol: String,
    /// Initial session exchange.
    pub exchange: String,
    /// Initial time range.
    pub range: String,
    /// Periodic refresh cadence in seconds.
    pub refresh_interval_secs: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8000".to_string(),
            symbol: "ATW".to_string(),
            exchange: "CSEMA".to_string(),
            range: "1d".to_string(),
            refresh_interval_secs: 10,
        }
    }
}

impl EngineConfig {
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs)
    }
}
