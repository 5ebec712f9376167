//! Port trait definitions for the Application layer.
//!
//! Ports are the interfaces (contracts) that infrastructure must fulfill.
//! This file imports only from `crate::domain`, never from `crate::infra`,
//! `crate::commands`, or `crate::output`.

use std::path::{Path, PathBuf};

use anyhow::Result;
use chrono::NaiveDateTime;

use crate::domain::config::{EditorConfig, RemoteConfig};

// ── Value Types ───────────────────────────────────────────────────────────────

/// One write to the remote contents API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentUpdate {
    /// Commit message.
    pub message: String,
    /// Raw file bytes (encoded by the implementation as the API requires).
    pub content: Vec<u8>,
    /// Revision marker of the file being replaced; `None` creates the file.
    pub revision: Option<String>,
}

// ── Filesystem Port ───────────────────────────────────────────────────────────

/// Abstracts the local filesystem so store services can be tested against
/// failing or recording implementations.
pub trait LocalFs {
    /// Whether `path` exists.
    fn exists(&self, path: &Path) -> bool;
    /// Create `path` and all missing parents.
    fn create_dir_all(&self, path: &Path) -> Result<()>;
    /// Read a whole file.
    fn read(&self, path: &Path) -> Result<Vec<u8>>;
    /// Replace the contents of `path` so that readers never observe a
    /// half-written file.
    fn write_atomic(&self, path: &Path, content: &[u8]) -> Result<()>;
    /// Copy `from` to `to` byte for byte.
    fn copy(&self, from: &Path, to: &Path) -> Result<()>;
    /// Remove a single file.
    fn remove_file(&self, path: &Path) -> Result<()>;
    /// Names of the regular files directly inside `dir`.
    fn list_file_names(&self, dir: &Path) -> Result<Vec<String>>;
}

// ── Clock Port ────────────────────────────────────────────────────────────────

/// Source of the local wall-clock time used to stamp backups and commits.
pub trait Clock {
    /// Current local time.
    fn now(&self) -> NaiveDateTime;
}

// ── Config Port ───────────────────────────────────────────────────────────────

/// Abstracts configuration persistence.
pub trait ConfigStore {
    /// Load configuration, returning defaults when no file exists.
    fn load(&self) -> Result<EditorConfig>;
    /// Persist configuration.
    fn save(&self, config: &EditorConfig) -> Result<()>;
    /// Location of the configuration file.
    fn path(&self) -> Result<PathBuf>;
}

// ── Remote Content Port ───────────────────────────────────────────────────────

/// A REST-style content API addressed by owner / repository / branch / path.
pub trait ContentApi {
    /// Fetch the revision marker of the file at `target`.
    ///
    /// Returns `Ok(None)` when the file does not exist yet.
    fn fetch_revision(&self, target: &RemoteConfig) -> Result<Option<String>>;
    /// Create or update the file at `target`.
    fn put_content(&self, target: &RemoteConfig, update: &ContentUpdate) -> Result<()>;
}

// ── Progress Reporting Port ───────────────────────────────────────────────────

/// Abstracts progress reporting so services can emit events without
/// depending on the Presentation layer.
pub trait ProgressReporter {
    /// Emit an in-progress step message.
    fn step(&self, message: &str);
    /// Emit a success message.
    fn success(&self, message: &str);
    /// Emit a warning message.
    fn warn(&self, message: &str);
}
