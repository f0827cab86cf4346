//! File config for connection defaults.
//!
//! Persists the base URL and token under the platform config directory so
//! repeated invocations don't need flags.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FileConfig {
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default)]
    pub token: Option<String>,
}

fn config_path() -> Result<PathBuf> {
    let dir = dirs::config_dir().context("could not resolve the config directory")?;
    Ok(dir.join("container-edit").join("config.json"))
}

/// Load saved defaults. A missing file is not an error.
pub fn load_config() -> Result<FileConfig> {
    let path = config_path()?;
    if !path.exists() {
        return Ok(FileConfig::default());
    }
    let raw = fs::read_to_string(&path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("invalid config at {}", path.display()))
}

/// Persist connection defaults, creating the directory if needed.
/// Returns the path written for user feedback.
pub fn save_config(cfg: &FileConfig) -> Result<PathBuf> {
    let path = config_path()?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    fs::write(&path, serde_json::to_string_pretty(cfg)?)
        .with_context(|| format!("failed to write {}", path.display()))?;
    Ok(path)
}
