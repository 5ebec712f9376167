//! Application service: API key format checks over a collection or file.

use std::path::Path;

use anyhow::Result;
use serde::Serialize;

use crate::application::ports::LocalFs;
use crate::application::services::agent_file::parse_agents;
use crate::domain::agent::{AgentRecord, KeyIssue, KeyVerdict, mask_key, validate_api_key};

/// Verdict for one record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeyReport {
    /// 1-based position in the collection.
    pub position: usize,
    pub name: String,
    /// Key shortened for display.
    pub key_preview: String,
    pub accepted: bool,
    /// `None` when accepted.
    pub issue: Option<KeyIssue>,
    pub reason: &'static str,
}

/// Check the key of every record.
#[must_use]
pub fn check_records(agents: &[AgentRecord]) -> Vec<KeyReport> {
    agents
        .iter()
        .enumerate()
        .map(|(i, agent)| {
            let verdict = validate_api_key(&agent.api_key_variable_name);
            let name = if agent.name.trim().is_empty() {
                format!("Agent {}", i + 1)
            } else {
                agent.name.clone()
            };
            KeyReport {
                position: i + 1,
                name,
                key_preview: mask_key(&agent.api_key_variable_name),
                accepted: verdict.is_accepted(),
                issue: match verdict {
                    KeyVerdict::Accepted => None,
                    KeyVerdict::Rejected(issue) => Some(issue),
                },
                reason: verdict.reason(),
            }
        })
        .collect()
}

/// Read an agents file without modifying it and check every key.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub fn check_file(fs: &impl LocalFs, path: &Path) -> Result<Vec<KeyReport>> {
    let bytes = fs.read(path)?;
    let agents = parse_agents(&bytes, &path.display().to_string())?;
    Ok(check_records(&agents))
}

/// `true` when every report is accepted.
#[must_use]
pub fn all_accepted(reports: &[KeyReport]) -> bool {
    reports.iter().all(|r| r.accepted)
}
