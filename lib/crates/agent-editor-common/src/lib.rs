pub mod agent;

pub use agent::{
    AgentRecord, COPY_ID_SUFFIX, COPY_NAME_MARKER, DEFAULT_API_URL, DEFAULT_MAX_TOKENS,
    DEFAULT_MODEL, DEFAULT_TEMPERATURE, DEFAULT_WELCOME_MESSAGE, PLACEHOLDER_API_KEY,
};
