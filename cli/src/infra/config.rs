//! Infrastructure implementation of the `ConfigStore` port, plus the
//! access-token file that lives next to the configuration.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use crate::application::ports::ConfigStore;
use crate::domain::config::EditorConfig;
use crate::infra::fs::write_private;

/// Environment variable overriding the configuration file location.
pub const CONFIG_ENV: &str = "AGENT_EDITOR_CONFIG";

/// Environment variable holding the remote API token.
pub const TOKEN_ENV: &str = "GITHUB_TOKEN";

/// Name of the token file stored beside the configuration file.
pub const TOKEN_FILE_NAME: &str = "github_token";

/// Production implementation of `ConfigStore` that uses a YAML file on disk.
pub struct YamlConfigStore;

impl ConfigStore for YamlConfigStore {
    fn load(&self) -> Result<EditorConfig> {
        let path = self.path()?;
        if !path.exists() {
            return Ok(EditorConfig::default());
        }
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("cannot read {}", path.display()))?;
        if content.trim().is_empty() {
            return Ok(EditorConfig::default());
        }
        serde_yaml::from_str(&content).with_context(|| format!("cannot parse {}", path.display()))
    }

    fn save(&self, config: &EditorConfig) -> Result<()> {
        let path = self.path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("cannot create {}", parent.display()))?;
        }
        let content = serde_yaml::to_string(config).context("cannot serialize config")?;
        write_private(&path, content.as_bytes())
    }

    fn path(&self) -> Result<PathBuf> {
        if let Ok(val) = std::env::var(CONFIG_ENV) {
            return Ok(PathBuf::from(val));
        }
        let home =
            dirs::home_dir().ok_or_else(|| anyhow::anyhow!("cannot determine home directory"))?;
        Ok(home.join(".agent-editor").join("config.yaml"))
    }
}

/// Location of the token file for a given configuration file.
#[must_use]
pub fn token_path(config_path: &Path) -> PathBuf {
    config_path
        .parent()
        .map_or_else(|| PathBuf::from(TOKEN_FILE_NAME), |dir| dir.join(TOKEN_FILE_NAME))
}

/// Resolve the API token: the environment wins, then the token file.
///
/// Returns `None` when neither holds a non-blank value.
#[must_use]
pub fn resolve_token(config_path: &Path) -> Option<String> {
    if let Ok(token) = std::env::var(TOKEN_ENV)
        && !token.trim().is_empty()
    {
        return Some(token.trim().to_string());
    }
    let path = token_path(config_path);
    match std::fs::read_to_string(&path) {
        Ok(content) if !content.trim().is_empty() => Some(content.trim().to_string()),
        Ok(_) => None,
        Err(e) => {
            if e.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!(path = %path.display(), error = %e, "cannot read token file");
            }
            None
        }
    }
}

/// Store `token` in the token file, readable by the owner only.
///
/// # Errors
///
/// Returns an error if the token is blank or the file cannot be written.
pub fn save_token(config_path: &Path, token: &str) -> Result<PathBuf> {
    let token = token.trim();
    anyhow::ensure!(!token.is_empty(), "token cannot be empty");
    let path = token_path(config_path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("cannot create {}", parent.display()))?;
    }
    write_private(&path, format!("{token}\n").as_bytes())?;
    Ok(path)
}
