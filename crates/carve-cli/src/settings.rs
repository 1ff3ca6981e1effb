//! CLI settings
//!
//! Stored in `{config_dir}/carve/settings.json`. A missing or unreadable
//! default file falls back to defaults; an explicit `--config` must load.

use anyhow::{Context, Result};
use carve_engine::EngineConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Settings for the `carve` binary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Session defaults
    pub engine: EngineConfig,
    /// Whether the REPL keeps history across runs
    pub save_history: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            engine: EngineConfig::default(),
            save_history: true,
        }
    }
}

/// Get the path to the default settings file
fn settings_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("carve").join("settings.json"))
}

fn read_settings(path: &Path) -> Result<Settings> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read settings from {}", path.display()))?;
    serde_json::from_str(&contents)
        .with_context(|| format!("Invalid settings in {}", path.display()))
}

/// Load settings from `explicit`, or from the default location
pub fn load_settings(explicit: Option<&Path>) -> Result<Settings> {
    if let Some(path) = explicit {
        return read_settings(path);
    }

    let Some(path) = settings_path() else {
        return Ok(Settings::default());
    };
    if !path.exists() {
        return Ok(Settings::default());
    }

    match read_settings(&path) {
        Ok(settings) => Ok(settings),
        Err(e) => {
            warn!("{:#}; using defaults", e);
            Ok(Settings::default())
        }
    }
}
