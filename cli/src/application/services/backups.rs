//! Application service: backup snapshots.
//!
//! Backups are flat JSON files in one directory, named by
//! [`BackupName`]. Once written they are only ever read or deleted.

use std::path::Path;

use anyhow::{Context, Result};

use crate::application::ports::{Clock, LocalFs};
use crate::application::services::agent_file::{parse_agents, serialize_agents};
use crate::domain::agent::AgentRecord;
use crate::domain::backup::{self, BackupKind, BackupName, parse_backup_id};
use crate::domain::error::{BackupError, StoreError};

/// Pick the first free name for a snapshot taken now.
fn allocate_name(
    fs: &impl LocalFs,
    clock: &impl Clock,
    dir: &Path,
    kind: BackupKind,
) -> Result<BackupName> {
    fs.create_dir_all(dir)?;
    let base = BackupName::new(kind, &clock.now());
    let mut seq = 0;
    loop {
        let candidate = base.with_seq(seq);
        if !fs.exists(&dir.join(candidate.file_name())) {
            return Ok(candidate);
        }
        seq += 1;
    }
}

/// Copy the file at `source` byte for byte into a new snapshot.
///
/// # Errors
///
/// Returns an error if the backup directory cannot be created or the copy
/// fails.
pub fn copy_into_backups(
    fs: &impl LocalFs,
    clock: &impl Clock,
    dir: &Path,
    kind: BackupKind,
    source: &Path,
) -> Result<BackupName> {
    let name = allocate_name(fs, clock, dir, kind)?;
    fs.copy(source, &dir.join(name.file_name()))?;
    Ok(name)
}

/// Write the in-memory collection to a new manual snapshot.
///
/// # Errors
///
/// Returns [`StoreError::NothingToBackUp`] for an empty collection, or an
/// error if the snapshot cannot be written.
pub fn create_manual(
    fs: &impl LocalFs,
    clock: &impl Clock,
    dir: &Path,
    agents: &[AgentRecord],
) -> Result<BackupName> {
    if agents.is_empty() {
        return Err(StoreError::NothingToBackUp.into());
    }
    let content = serialize_agents(agents)?;
    let name = allocate_name(fs, clock, dir, BackupKind::Manual)?;
    fs.write_atomic(&dir.join(name.file_name()), &content)?;
    tracing::info!(backup = %name, count = agents.len(), "manual backup created");
    Ok(name)
}

/// All snapshots in `dir`, most recent first. A missing directory has none.
///
/// # Errors
///
/// Returns an error if the directory exists but cannot be listed.
pub fn list(fs: &impl LocalFs, dir: &Path) -> Result<Vec<BackupName>> {
    if !fs.exists(dir) {
        return Ok(Vec::new());
    }
    let names = fs.list_file_names(dir)?;
    Ok(backup::newest_first(names))
}

/// Resolve a user-supplied id to an existing snapshot.
fn existing(fs: &impl LocalFs, dir: &Path, id: &str) -> Result<BackupName> {
    let name = parse_backup_id(id)?;
    if !fs.exists(&dir.join(name.file_name())) {
        return Err(BackupError::NotFound(id.to_string()).into());
    }
    Ok(name)
}

/// Parse the snapshot `id`.
///
/// # Errors
///
/// Returns an error if the id is invalid or missing, or the snapshot cannot
/// be read or parsed.
pub fn read(fs: &impl LocalFs, dir: &Path, id: &str) -> Result<Vec<AgentRecord>> {
    let name = existing(fs, dir, id)?;
    let bytes = fs.read(&dir.join(name.file_name()))?;
    parse_agents(&bytes, &name.file_name())
}

/// Delete the snapshot `id`.
///
/// # Errors
///
/// Returns an error if the id is invalid or missing, or removal fails.
pub fn delete(fs: &impl LocalFs, dir: &Path, id: &str) -> Result<()> {
    let name = existing(fs, dir, id)?;
    fs.remove_file(&dir.join(name.file_name()))
        .with_context(|| format!("deleting backup {name}"))?;
    tracing::info!(backup = %name, "backup deleted");
    Ok(())
}

/// Delete the oldest snapshots until at most `max_count` remain.
///
/// Returns the deleted names, oldest first.
///
/// # Errors
///
/// Returns an error if listing fails or a snapshot cannot be removed; the
/// snapshots removed before the failure stay removed.
pub fn prune(fs: &impl LocalFs, dir: &Path, max_count: usize) -> Result<Vec<BackupName>> {
    let sorted = list(fs, dir)?;
    let plan = backup::prune_plan(&sorted, max_count);
    for name in &plan {
        fs.remove_file(&dir.join(name.file_name()))
            .with_context(|| format!("pruning backup {name}"))?;
        tracing::info!(backup = %name, "old backup pruned");
    }
    Ok(plan)
}
