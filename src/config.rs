//! File locations and user settings.
//!
//! Data files default to the platform data directory:
//! *   Linux: `~/.local/share/choreust/`
//! *   macOS: `~/Library/Application Support/choreust/`
//! *   Windows: `%LOCALAPPDATA%\choreust\`
//!
//! `CHORES_DB` overrides the chores file; `members.json` always sits next to it.
//! Settings are read from `CHOREUST_CONFIG` or `<config dir>/choreust/config.toml`.

use std::fs;
use std::path::{Path, PathBuf};
use serde::{Deserialize, Serialize};
use crate::error::{ChoreError, Result};

/// Returns the path to the chores database file (`chores.json`).
///
/// The path is determined in the following order:
/// 1. `CHORES_DB` environment variable.
/// 2. `<data dir>/choreust/chores.json`.
/// 3. `./chores.json` (fallback).
pub fn chores_path() -> PathBuf {
    std::env::var_os("CHORES_DB").map(PathBuf::from).unwrap_or_else(|| {
        let mut p = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
        p.push("choreust");
        if !p.exists() {
            let _ = fs::create_dir_all(&p);
        }
        p.push("chores.json");
        p
    })
}

/// Returns the path to the team members file (`members.json`).
pub fn members_path() -> PathBuf {
    let mut p = chores_path();
    p.pop();
    p.push("members.json");
    p
}

/// Returns the settings file path, whether or not it exists.
pub fn config_path() -> PathBuf {
    if let Some(path) = std::env::var_os("CHOREUST_CONFIG") {
        return PathBuf::from(path);
    }
    dirs::config_dir()
        .map(|d| d.join("choreust").join("config.toml"))
        .unwrap_or_else(|| PathBuf::from("choreust.toml"))
}

/// User settings.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Whole months before the current one shown by `calendar` without `--from`.
    pub lookbehind_months: u32,
    /// Whole months after the current one shown by `calendar` without `--to`.
    pub lookahead_months: u32,
    /// `tracing` filter used when `RUST_LOG` is unset.
    pub log_filter: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            lookbehind_months: 0,
            lookahead_months: 0,
            log_filter: "choreust=warn".to_string(),
        }
    }
}

impl Config {
    /// Loads settings from `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid TOML.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| ChoreError::Config(e.to_string()))
    }

    /// Loads settings from [`config_path`], falling back to defaults when absent.
    pub fn load() -> Result<Self> {
        let path = config_path();
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::from_file(&path)
    }

    /// Writes settings as TOML, creating parent directories as needed.
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| ChoreError::Config(e.to_string()))?;
        fs::write(path, content)?;
        Ok(())
    }
}
