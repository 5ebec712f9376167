//! Pure validation: no I/O.
//!
//! All functions in this module are synchronous and take data in, returning
//! data out. Zero imports from `std::fs`, `crate::infra`, `crate::commands`,
//! or `crate::application`.

use agent_editor_common::{AgentRecord, PLACEHOLDER_API_KEY};
use anyhow::Result;
use serde::Serialize;

use crate::domain::error::StoreError;

/// Key prefixes the format check accepts.
pub const ACCEPTED_KEY_PREFIXES: &[&str] = &["sk-", "gsk_", "API_"];

/// Keys shorter than this (in characters, after trimming) are rejected.
pub const MIN_KEY_LEN: usize = 20;

/// Number of leading key characters shown when a key is printed.
pub const KEY_PREVIEW_LEN: usize = 20;

/// Why a key was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyIssue {
    Empty,
    Placeholder,
    UnexpectedPrefix,
    TooShort,
}

impl KeyIssue {
    /// Short human-readable reason.
    #[must_use]
    pub fn reason(self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::Placeholder => "still a placeholder",
            Self::UnexpectedPrefix => "unexpected prefix",
            Self::TooShort => "too short",
        }
    }
}

/// Outcome of [`validate_api_key`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyVerdict {
    Accepted,
    Rejected(KeyIssue),
}

impl KeyVerdict {
    #[must_use]
    pub fn is_accepted(self) -> bool {
        matches!(self, Self::Accepted)
    }

    #[must_use]
    pub fn reason(self) -> &'static str {
        match self {
            Self::Accepted => "looks valid",
            Self::Rejected(issue) => issue.reason(),
        }
    }
}

/// Classify `key` as an acceptable credential reference.
///
/// Rules run in order and the first failing rule wins:
/// 1. empty or whitespace only
/// 2. equal to [`PLACEHOLDER_API_KEY`] after trimming
/// 3. no prefix from [`ACCEPTED_KEY_PREFIXES`]
/// 4. fewer than [`MIN_KEY_LEN`] characters after trimming
///
/// This is a format heuristic: keys from providers using other prefixes are
/// rejected on purpose.
#[must_use]
pub fn validate_api_key(key: &str) -> KeyVerdict {
    let key = key.trim();
    if key.is_empty() {
        return KeyVerdict::Rejected(KeyIssue::Empty);
    }
    if key == PLACEHOLDER_API_KEY {
        return KeyVerdict::Rejected(KeyIssue::Placeholder);
    }
    if !ACCEPTED_KEY_PREFIXES.iter().any(|p| key.starts_with(p)) {
        return KeyVerdict::Rejected(KeyIssue::UnexpectedPrefix);
    }
    if key.chars().count() < MIN_KEY_LEN {
        return KeyVerdict::Rejected(KeyIssue::TooShort);
    }
    KeyVerdict::Accepted
}

/// Shorten a key for display: the first [`KEY_PREVIEW_LEN`] characters,
/// followed by `...` when anything was cut.
#[must_use]
pub fn mask_key(key: &str) -> String {
    let mut chars = key.chars();
    let head: String = chars.by_ref().take(KEY_PREVIEW_LEN).collect();
    if chars.next().is_some() {
        format!("{head}...")
    } else {
        head
    }
}

/// Check the persistence invariants of one record.
///
/// `position` is 1-based and only used in the error message.
///
/// # Errors
///
/// Returns a [`StoreError`] for an empty id or name, a non-finite
/// temperature, or a zero token limit.
pub fn validate_record(position: usize, record: &AgentRecord) -> Result<()> {
    if record.id.trim().is_empty() {
        return Err(StoreError::EmptyId { position }.into());
    }
    if record.name.trim().is_empty() {
        return Err(StoreError::EmptyName { position }.into());
    }
    if !record.temperature.is_finite() {
        return Err(StoreError::NonFiniteTemperature { position }.into());
    }
    if record.max_tokens == 0 {
        return Err(StoreError::ZeroMaxTokens { position }.into());
    }
    Ok(())
}

/// Check every record of a collection, reporting the first violation.
///
/// # Errors
///
/// Returns the first [`validate_record`] failure.
pub fn validate_collection(records: &[AgentRecord]) -> Result<()> {
    records
        .iter()
        .enumerate()
        .try_for_each(|(i, rec)| validate_record(i + 1, rec))
}

// ── Unit tests ───────────────────────────────────────────────────────────────
