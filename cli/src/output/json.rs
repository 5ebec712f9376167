//! JSON output helpers.
//!
//! Row types for `--json` listings and the error-object formatter used by
//! every `--json` code path when a command fails.

use anyhow::{Context, Result};
use serde::Serialize;

use crate::domain::agent::{AgentRecord, KeyIssue, KeyVerdict, validate_api_key};
use crate::domain::backup::{BackupKind, BackupName};

/// One row of `agents list --json`.
#[derive(Debug, Serialize)]
pub struct AgentSummary<'a> {
    /// 1-based position, as accepted by `agents show/edit/delete`.
    pub position: usize,
    pub id: &'a str,
    pub name: &'a str,
    pub model: &'a str,
    pub selected: bool,
    pub key_accepted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key_issue: Option<KeyIssue>,
}

impl<'a> AgentSummary<'a> {
    #[must_use]
    pub fn new(index: usize, agent: &'a AgentRecord, selection: Option<usize>) -> Self {
        let verdict = validate_api_key(&agent.api_key_variable_name);
        Self {
            position: index + 1,
            id: &agent.id,
            name: &agent.name,
            model: &agent.model,
            selected: selection == Some(index),
            key_accepted: verdict.is_accepted(),
            key_issue: match verdict {
                KeyVerdict::Accepted => None,
                KeyVerdict::Rejected(issue) => Some(issue),
            },
        }
    }
}

/// One row of `backup list --json`.
#[derive(Debug, Serialize)]
pub struct BackupSummary {
    pub id: String,
    pub kind: BackupKind,
    /// `YYYY-MM-DD HH:MM:SS` local time.
    pub taken_at: Option<String>,
}

impl From<&BackupName> for BackupSummary {
    fn from(name: &BackupName) -> Self {
        Self {
            id: name.file_name(),
            kind: name.kind,
            taken_at: name
                .taken_at()
                .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string()),
        }
    }
}

/// Pretty-print any serializable value.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn to_pretty<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).context("JSON serialization failed")
}

/// Format a JSON error object.
///
/// Output (pretty-printed):
/// ```json
/// {
///   "error": true,
///   "message": "...",
///   "code": "..."
/// }
/// ```
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn format_error(message: &str, code: &str) -> Result<String> {
    let obj = serde_json::json!({
        "error": true,
        "message": message,
        "code": code,
    });
    serde_json::to_string_pretty(&obj).context("JSON serialization failed")
}

/// Machine-readable code for a command failure, by error family.
#[must_use]
pub fn error_code(err: &anyhow::Error) -> &'static str {
    use crate::domain::error::{BackupError, ConfigError, StoreError, SyncError};
    if err.downcast_ref::<StoreError>().is_some() {
        "store_error"
    } else if err.downcast_ref::<BackupError>().is_some() {
        "backup_error"
    } else if err.downcast_ref::<ConfigError>().is_some() {
        "config_error"
    } else if err.downcast_ref::<SyncError>().is_some() {
        "sync_error"
    } else {
        "command_failed"
    }
}
