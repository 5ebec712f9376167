//! Domain types and validators for agent-editor configuration.
//!
//! Pure functions only: no I/O, no filesystem access.

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::domain::backup::DEFAULT_MAX_BACKUPS;
use crate::domain::error::ConfigError;

// ── Constants ────────────────────────────────────────────────────────────────

pub const VALID_CONFIG_KEYS: &[&str] = &[
    "store.agents_file",
    "store.backup_dir",
    "store.max_backups",
    "remote.owner",
    "remote.repo",
    "remote.branch",
    "remote.file_path",
];

// ── Config schema ────────────────────────────────────────────────────────────

/// Top-level configuration stored in `~/.agent-editor/config.yaml`.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct EditorConfig {
    /// Where agents and backups live.
    #[serde(default)]
    pub store: StoreConfig,
    /// Target of `agent-editor sync`.
    #[serde(default)]
    pub remote: RemoteConfig,
}

/// Local storage settings. Relative paths resolve against the working directory.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct StoreConfig {
    pub agents_file: String,
    pub backup_dir: String,
    /// Backups kept by rotation when the store is opened.
    pub max_backups: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            agents_file: "agents.json".to_string(),
            backup_dir: "backups".to_string(),
            max_backups: DEFAULT_MAX_BACKUPS,
        }
    }
}

/// GitHub repository that receives the agents file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RemoteConfig {
    pub owner: String,
    pub repo: String,
    pub branch: String,
    /// Path of the file inside the repository.
    pub file_path: String,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            owner: String::new(),
            repo: String::new(),
            branch: "main".to_string(),
            file_path: "agents.json".to_string(),
        }
    }
}

impl RemoteConfig {
    /// `true` once both owner and repository are set.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        !self.owner.trim().is_empty() && !self.repo.trim().is_empty()
    }
}

// ── Validators ───────────────────────────────────────────────────────────────

/// Validates a configuration key against the whitelist.
///
/// # Errors
///
/// Returns an error if the key is not in the allowed list.
pub fn validate_config_key(key: &str) -> Result<()> {
    if !VALID_CONFIG_KEYS.contains(&key) {
        return Err(ConfigError::UnknownKey {
            key: key.to_string(),
            valid: VALID_CONFIG_KEYS.join(", "),
        }
        .into());
    }
    Ok(())
}

/// Validates a configuration value for the given key.
///
/// # Errors
///
/// Returns an error if the value is not valid for the key.
pub fn validate_config_value(key: &str, value: &str) -> Result<()> {
    let invalid = |expected: &str| -> anyhow::Error {
        ConfigError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
            expected: expected.to_string(),
        }
        .into()
    };
    match key {
        "store.max_backups" => match value.parse::<usize>() {
            Ok(n) if n >= 1 => Ok(()),
            _ => Err(invalid("an integer of at least 1")),
        },
        // Owner and repo may be cleared to disable sync.
        "remote.owner" | "remote.repo" => Ok(()),
        _ if value.trim().is_empty() => Err(invalid("a non-empty value")),
        _ => Ok(()),
    }
}

/// Apply a validated `key = value` pair to `config`.
///
/// # Errors
///
/// Returns an error if the key or value fails validation.
pub fn apply_setting(config: &mut EditorConfig, key: &str, value: &str) -> Result<()> {
    validate_config_key(key)?;
    validate_config_value(key, value)?;
    let value = value.trim().to_string();
    match key {
        "store.agents_file" => config.store.agents_file = value,
        "store.backup_dir" => config.store.backup_dir = value,
        "store.max_backups" => config.store.max_backups = value.parse()?,
        "remote.owner" => config.remote.owner = value,
        "remote.repo" => config.remote.repo = value,
        "remote.branch" => config.remote.branch = value,
        "remote.file_path" => config.remote.file_path = value,
        _ => anyhow::bail!("Unknown setting: {key}"),
    }
    Ok(())
}

// ── Unit tests ───────────────────────────────────────────────────────────────
