// lib/crates/agent-editor-common/src/agent.rs

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Key value written into new records until the user supplies a real one.
pub const PLACEHOLDER_API_KEY: &str = "YOUR_API_KEY_HERE";
pub const DEFAULT_API_URL: &str = "https://aihubmix.com/v1/chat/completions";
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";
pub const DEFAULT_TEMPERATURE: f64 = 0.7;
pub const DEFAULT_MAX_TOKENS: u32 = 2048;
pub const DEFAULT_WELCOME_MESSAGE: &str = "Ask me anything and I will answer.";

/// Appended to the id of a duplicated record.
pub const COPY_ID_SUFFIX: &str = "_copy";
/// Appended to the name of a duplicated record.
pub const COPY_NAME_MARKER: &str = " (copy)";

/// One entry of `agents.json`.
///
/// `id` and `name` are required when reading; every other field falls back
/// to an explicit default. Keys this type does not know are kept in
/// [`AgentRecord::extra`] and written back after the known keys.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentRecord {
    pub id: String,
    pub name: String,
    /// Holds the literal key value, despite the name.
    #[serde(rename = "apiKeyVariableName", default)]
    pub api_key_variable_name: String,
    #[serde(rename = "apiUrl", default)]
    pub api_url: String,
    #[serde(default)]
    pub model: String,
    #[serde(rename = "systemPrompt", default)]
    pub system_prompt: String,
    #[serde(default = "default_temperature")]
    pub temperature: f64,
    #[serde(alias = "maxTokens", default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(rename = "welcomeMessage", default)]
    pub welcome_message: String,
    /// Keys written by other tools, preserved verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn default_temperature() -> f64 {
    DEFAULT_TEMPERATURE
}

fn default_max_tokens() -> u32 {
    DEFAULT_MAX_TOKENS
}

impl AgentRecord {
    /// Build the record offered by the "new agent" action.
    ///
    /// `position` is the 1-based slot the record will occupy; it doubles as
    /// the suggested id.
    #[must_use]
    pub fn template(position: usize, api_key: Option<&str>) -> Self {
        let id = position.to_string();
        Self {
            name: format!("New Agent {id}"),
            id,
            api_key_variable_name: api_key.unwrap_or(PLACEHOLDER_API_KEY).to_string(),
            api_url: DEFAULT_API_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            system_prompt: String::new(),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
            welcome_message: DEFAULT_WELCOME_MESSAGE.to_string(),
            extra: Map::new(),
        }
    }

    /// Copy of this record whose id and name are marked as a copy.
    #[must_use]
    pub fn duplicate(&self) -> Self {
        let mut copy = self.clone();
        copy.id.push_str(COPY_ID_SUFFIX);
        copy.name.push_str(COPY_NAME_MARKER);
        copy
    }
}
