//! Typed domain error enums.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `std::fs`, or `std::net`.
//! All error types implement `thiserror::Error` and convert to `anyhow::Error`
//! via the `?` operator.

use thiserror::Error;

// ── Store errors ──────────────────────────────────────────────────────────────

/// Errors raised by record-store mutations and file parsing.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("No agent at position {position} (the list has {len}).")]
    IndexOutOfRange { position: usize, len: usize },

    #[error("Agent #{position}: id must not be empty.")]
    EmptyId { position: usize },

    #[error("Agent #{position}: name must not be empty.")]
    EmptyName { position: usize },

    #[error("Agent #{position}: temperature must be a finite number.")]
    NonFiniteTemperature { position: usize },

    #[error("Agent #{position}: max_tokens must be greater than zero.")]
    ZeroMaxTokens { position: usize },

    #[error("{source_name} is not valid JSON: {reason}")]
    MalformedJson { source_name: String, reason: String },

    #[error("{source_name} must contain a JSON array of agents: {reason}")]
    MalformedShape { source_name: String, reason: String },

    #[error("Nothing to back up: the agent list is empty.")]
    NothingToBackUp,

    #[error(
        "{path} could not be loaded, so saving would replace it with an incomplete list. \
         Fix the file or restore a backup first."
    )]
    LoadFailed { path: String },
}

// ── Backup errors ─────────────────────────────────────────────────────────────

/// Errors related to backup snapshots.
#[derive(Debug, Error)]
pub enum BackupError {
    #[error("Backup '{0}' not found.")]
    NotFound(String),

    #[error("Invalid backup name '{0}': expected agents_<kind>_<YYYYMMDD_HHMMSS>.json")]
    InvalidName(String),
}

// ── Config errors ─────────────────────────────────────────────────────────────

/// Errors related to configuration key/value validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Unknown setting: {key}\n\nValid settings: {valid}")]
    UnknownKey { key: String, valid: String },

    #[error("Invalid value for {key}: {value}\n\nExpected: {expected}")]
    InvalidValue {
        key: String,
        value: String,
        expected: String,
    },
}

// ── Sync errors ───────────────────────────────────────────────────────────────

/// Errors surfaced by the push to the remote contents API.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error(
        "Remote repository is not configured.\n\nSet it with: agent-editor config set remote.owner <owner> && agent-editor config set remote.repo <repo>"
    )]
    NotConfigured,

    #[error("{action} failed: HTTP {status}: {body}")]
    Http {
        action: &'static str,
        status: u16,
        body: String,
    },

    #[error("{action} failed: {reason}")]
    Transport {
        action: &'static str,
        reason: String,
    },
}
