//! Application service: reading and writing agent files.
//!
//! Covers the primary file (load with quarantine, save with pre-save backup)
//! and arbitrary import/export paths. All I/O goes through [`LocalFs`].

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::application::ports::{Clock, LocalFs};
use crate::application::services::backups;
use crate::domain::agent::{AgentRecord, validate_collection};
use crate::domain::backup::{BackupKind, BackupName};
use crate::domain::config::StoreConfig;
use crate::domain::error::StoreError;

/// Where the primary file and its backups live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreLayout {
    pub agents_file: PathBuf,
    pub backup_dir: PathBuf,
}

impl StoreLayout {
    #[must_use]
    pub fn new(agents_file: impl Into<PathBuf>, backup_dir: impl Into<PathBuf>) -> Self {
        Self {
            agents_file: agents_file.into(),
            backup_dir: backup_dir.into(),
        }
    }

    #[must_use]
    pub fn from_config(store: &StoreConfig) -> Self {
        Self::new(&store.agents_file, &store.backup_dir)
    }
}

/// What [`load`] found at the primary path.
#[derive(Debug)]
pub enum LoadOutcome {
    /// The file parsed; holds the record count.
    Loaded(usize),
    /// No file existed; an empty array was written.
    Created,
    /// The file existed but had zero length.
    Empty,
    /// The file was not valid JSON. Its bytes were copied to `backup` and the
    /// primary file was reset to an empty array.
    Quarantined { backup: BackupName, reason: String },
    /// Anything else: the collection is empty and the file was left alone.
    Failed(anyhow::Error),
}

/// Result of [`load`]: always a usable collection plus what happened.
#[derive(Debug)]
pub struct Loaded {
    pub agents: Vec<AgentRecord>,
    pub outcome: LoadOutcome,
}

impl Loaded {
    fn empty(outcome: LoadOutcome) -> Self {
        Self {
            agents: Vec::new(),
            outcome,
        }
    }
}

/// Serialize a collection the way every agents file is written: two-space
/// indentation, UTF-8 with non-ASCII left literal, trailing newline.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn serialize_agents(agents: &[AgentRecord]) -> Result<Vec<u8>> {
    let mut out = serde_json::to_vec_pretty(agents).context("serializing agents")?;
    out.push(b'\n');
    Ok(out)
}

/// Parse an agents file, separating syntax errors from shape errors.
///
/// # Errors
///
/// Returns [`StoreError::MalformedJson`] when `bytes` is not JSON and
/// [`StoreError::MalformedShape`] when it is JSON but not an array of records.
pub fn parse_agents(bytes: &[u8], source_name: &str) -> Result<Vec<AgentRecord>> {
    let value: serde_json::Value =
        serde_json::from_slice(bytes).map_err(|e| StoreError::MalformedJson {
            source_name: source_name.to_string(),
            reason: e.to_string(),
        })?;
    if !value.is_array() {
        return Err(StoreError::MalformedShape {
            source_name: source_name.to_string(),
            reason: "top-level value is not an array".to_string(),
        }
        .into());
    }
    serde_json::from_value(value).map_err(|e| {
        StoreError::MalformedShape {
            source_name: source_name.to_string(),
            reason: e.to_string(),
        }
        .into()
    })
}

/// Load the primary file. Never fails: every problem is folded into the
/// returned [`LoadOutcome`] and the collection falls back to empty.
pub fn load(fs: &impl LocalFs, clock: &impl Clock, layout: &StoreLayout) -> Loaded {
    let path = &layout.agents_file;

    if !fs.exists(path) {
        tracing::debug!(path = %path.display(), "agents file missing, creating it");
        return match write_agents(fs, path, &[]) {
            Ok(()) => Loaded::empty(LoadOutcome::Created),
            Err(e) => Loaded::empty(LoadOutcome::Failed(e)),
        };
    }

    let bytes = match fs.read(path) {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "cannot read agents file");
            return Loaded::empty(LoadOutcome::Failed(e));
        }
    };
    if bytes.is_empty() {
        return Loaded::empty(LoadOutcome::Empty);
    }

    let source_name = path.display().to_string();
    match parse_agents(&bytes, &source_name) {
        Ok(agents) => Loaded {
            outcome: LoadOutcome::Loaded(agents.len()),
            agents,
        },
        Err(e) if matches!(e.downcast_ref::<StoreError>(), Some(StoreError::MalformedJson { .. })) => {
            quarantine(fs, clock, layout, &e.to_string())
        }
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "agents file has the wrong shape");
            Loaded::empty(LoadOutcome::Failed(e))
        }
    }
}

/// Copy a corrupt primary file aside, then reset it to an empty array.
/// The reset only happens once the copy exists.
fn quarantine(fs: &impl LocalFs, clock: &impl Clock, layout: &StoreLayout, reason: &str) -> Loaded {
    let path = &layout.agents_file;
    let backup = match backups::copy_into_backups(
        fs,
        clock,
        &layout.backup_dir,
        BackupKind::Quarantine,
        path,
    ) {
        Ok(name) => name,
        Err(e) => {
            let e = e.context("cannot quarantine corrupt agents file; it was left untouched");
            return Loaded::empty(LoadOutcome::Failed(e));
        }
    };
    tracing::warn!(path = %path.display(), backup = %backup, "corrupt agents file quarantined");

    match write_agents(fs, path, &[]) {
        Ok(()) => Loaded::empty(LoadOutcome::Quarantined {
            backup,
            reason: reason.to_string(),
        }),
        Err(e) => Loaded::empty(LoadOutcome::Failed(e)),
    }
}

/// Save the collection to the primary file.
///
/// If the file exists it is first copied, unmodified, into an auto backup;
/// the write only happens after that copy succeeded. A failed write leaves
/// the backup in place.
///
/// Returns the auto backup's name when one was made.
///
/// # Errors
///
/// Returns an error if a record violates the persistence invariants, the
/// backup copy fails, or the write fails.
pub fn save(
    fs: &impl LocalFs,
    clock: &impl Clock,
    layout: &StoreLayout,
    agents: &[AgentRecord],
) -> Result<Option<BackupName>> {
    validate_collection(agents)?;
    let path = &layout.agents_file;

    let backup = if fs.exists(path) {
        let name = backups::copy_into_backups(
            fs,
            clock,
            &layout.backup_dir,
            BackupKind::Auto,
            path,
        )
        .context("creating pre-save backup; the agents file was not written")?;
        tracing::info!(backup = %name, "auto backup created");
        Some(name)
    } else {
        None
    };

    write_agents(fs, path, agents)?;
    tracing::debug!(path = %path.display(), count = agents.len(), "agents saved");
    Ok(backup)
}

/// Parse an external file for import. Nothing is returned unless the whole
/// file is a valid array of valid records.
///
/// # Errors
///
/// Returns an error if the file cannot be read, is not a JSON array of
/// records, or a record violates the persistence invariants.
pub fn read_import(fs: &impl LocalFs, path: &Path) -> Result<Vec<AgentRecord>> {
    let bytes = fs.read(path)?;
    let agents = parse_agents(&bytes, &path.display().to_string())?;
    validate_collection(&agents)
        .with_context(|| format!("rejecting import from {}", path.display()))?;
    Ok(agents)
}

/// Write `agents` verbatim to `path`, outside the backup system.
///
/// # Errors
///
/// Returns an error if serialization or the write fails.
pub fn export(fs: &impl LocalFs, path: &Path, agents: &[AgentRecord]) -> Result<()> {
    write_agents(fs, path, agents)
}

fn write_agents(fs: &impl LocalFs, path: &Path, agents: &[AgentRecord]) -> Result<()> {
    let content = serialize_agents(agents)?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs.create_dir_all(parent)?;
    }
    fs.write_atomic(path, &content)
}
