//! Application service: configuration use-cases.

use crate::application::ports::ConfigStore;
use crate::domain::config::{EditorConfig, apply_setting};
use anyhow::Result;

/// Load configuration.
pub fn load_config(store: &impl ConfigStore) -> Result<EditorConfig> {
    store.load()
}

/// Save configuration.
pub fn save_config(store: &impl ConfigStore, config: &EditorConfig) -> Result<()> {
    store.save(config)
}

/// Validate and persist one `key = value` setting. Returns the new config.
///
/// Nothing is written when validation fails.
pub fn set_value(store: &impl ConfigStore, key: &str, value: &str) -> Result<EditorConfig> {
    let mut config = store.load()?;
    apply_setting(&mut config, key, value)?;
    store.save(&config)?;
    tracing::info!(key, "configuration updated");
    Ok(config)
}
