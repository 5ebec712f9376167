//! Application service: the agent store.
//!
//! [`AgentStore`] owns the in-memory collection and the current selection.
//! Every mutation validates before it touches state, so a failed call leaves
//! the store exactly as it was. Persistence goes through [`agent_file`] and
//! [`backups`], which route all I/O through the injected ports.
//!
//! Indexes are 0-based here; errors report 1-based positions.

use std::path::Path;

use anyhow::Result;

use crate::application::ports::{Clock, LocalFs};
use crate::application::services::agent_file::{self, LoadOutcome, StoreLayout};
use crate::application::services::backups;
use crate::domain::agent::{AgentRecord, validate_collection, validate_record};
use crate::domain::backup::BackupName;
use crate::domain::error::StoreError;

/// How imported records combine with the current collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportMode {
    /// Discard the current collection.
    Replace,
    /// Extend the current collection.
    Append,
}

/// What happened while opening the store.
#[derive(Debug)]
pub struct OpenReport {
    /// Result of the start-up backup rotation.
    pub pruned: Result<Vec<BackupName>>,
    /// Result of loading the primary file.
    pub load: LoadOutcome,
}

/// In-memory agent collection bound to a primary file and a backup directory.
pub struct AgentStore<'a, F, C> {
    fs: &'a F,
    clock: &'a C,
    layout: StoreLayout,
    agents: Vec<AgentRecord>,
    selection: Option<usize>,
    load_failed: bool,
}

impl<'a, F: LocalFs, C: Clock> AgentStore<'a, F, C> {
    /// Rotate old backups down to `max_backups`, then load the primary file.
    ///
    /// Never fails: problems are reported in the [`OpenReport`] and the
    /// collection falls back to empty. The first record is selected.
    ///
    /// When the primary file could not be loaded, [`AgentStore::save`]
    /// refuses to write until the collection is replaced wholesale or the
    /// caller calls [`AgentStore::allow_overwrite`].
    pub fn open(fs: &'a F, clock: &'a C, layout: StoreLayout, max_backups: usize) -> (Self, OpenReport) {
        let pruned = backups::prune(fs, &layout.backup_dir, max_backups);
        if let Err(e) = &pruned {
            tracing::warn!(error = %e, "backup rotation failed");
        }
        let loaded = agent_file::load(fs, clock, &layout);
        let mut store = Self {
            fs,
            clock,
            layout,
            agents: Vec::new(),
            selection: None,
            load_failed: matches!(loaded.outcome, LoadOutcome::Failed(_)),
        };
        store.set_agents(loaded.agents);
        (
            store,
            OpenReport {
                pruned,
                load: loaded.outcome,
            },
        )
    }

    #[must_use]
    pub fn layout(&self) -> &StoreLayout {
        &self.layout
    }

    /// False when the primary file could not be read or parsed and the
    /// in-memory collection is only the empty fallback.
    #[must_use]
    pub fn loaded_cleanly(&self) -> bool {
        !self.load_failed
    }

    /// Let [`AgentStore::save`] overwrite a primary file that failed to load.
    /// The file is still backed up before it is replaced.
    pub fn allow_overwrite(&mut self) {
        if self.load_failed {
            tracing::warn!(
                path = %self.layout.agents_file.display(),
                "overwriting a file that failed to load"
            );
        }
        self.load_failed = false;
    }

    #[must_use]
    pub fn agents(&self) -> &[AgentRecord] {
        &self.agents
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.agents.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    /// Index of the selected record, if any.
    #[must_use]
    pub fn selection(&self) -> Option<usize> {
        self.selection
    }

    #[must_use]
    pub fn selected(&self) -> Option<&AgentRecord> {
        self.selection.and_then(|i| self.agents.get(i))
    }

    /// # Errors
    ///
    /// Returns [`StoreError::IndexOutOfRange`] for a bad index.
    pub fn get(&self, index: usize) -> Result<&AgentRecord> {
        self.check_index(index)?;
        Ok(&self.agents[index])
    }

    /// # Errors
    ///
    /// Returns [`StoreError::IndexOutOfRange`] for a bad index.
    pub fn select(&mut self, index: usize) -> Result<()> {
        self.check_index(index)?;
        self.selection = Some(index);
        Ok(())
    }

    /// The record the "new agent" action starts from: next position as id,
    /// first record's key when there is one.
    #[must_use]
    pub fn new_record_template(&self) -> AgentRecord {
        let key = self.agents.first().map(|a| a.api_key_variable_name.as_str());
        AgentRecord::template(self.agents.len() + 1, key)
    }

    /// Append `record` and select it. Returns its index.
    ///
    /// # Errors
    ///
    /// Returns an error if the record violates the persistence invariants.
    pub fn add(&mut self, record: AgentRecord) -> Result<usize> {
        validate_record(self.agents.len() + 1, &record)?;
        self.agents.push(record);
        let index = self.agents.len() - 1;
        self.selection = Some(index);
        Ok(index)
    }

    /// Append a copy of the record at `index` with its id and name marked as
    /// a copy, and select it. Returns the copy's index.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::IndexOutOfRange`] for a bad index.
    pub fn duplicate(&mut self, index: usize) -> Result<usize> {
        self.check_index(index)?;
        let copy = self.agents[index].duplicate();
        self.agents.push(copy);
        let new_index = self.agents.len() - 1;
        self.selection = Some(new_index);
        Ok(new_index)
    }

    /// Remove the record at `index` and return it.
    ///
    /// The selection moves to the record that followed it, to the new last
    /// record when the removed one was last, or to nothing when the list is
    /// now empty.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::IndexOutOfRange`] for a bad index.
    pub fn delete(&mut self, index: usize) -> Result<AgentRecord> {
        self.check_index(index)?;
        let removed = self.agents.remove(index);
        self.selection = if self.agents.is_empty() {
            None
        } else {
            Some(index.min(self.agents.len() - 1))
        };
        Ok(removed)
    }

    /// Replace the record at `index`. The selection does not change.
    ///
    /// # Errors
    ///
    /// Returns an error for a bad index or a record violating the
    /// persistence invariants.
    pub fn replace(&mut self, index: usize, record: AgentRecord) -> Result<()> {
        self.check_index(index)?;
        validate_record(index + 1, &record)?;
        self.agents[index] = record;
        Ok(())
    }

    /// Import the agents file at `path`. Returns the number of imported
    /// records; the first record of the result is selected.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not a valid array of
    /// records. Nothing is applied in that case.
    pub fn import(&mut self, path: &Path, mode: ImportMode) -> Result<usize> {
        let imported = agent_file::read_import(self.fs, path)?;
        let count = imported.len();
        match mode {
            ImportMode::Replace => {
                self.agents = imported;
                self.load_failed = false;
            }
            ImportMode::Append => self.agents.extend(imported),
        }
        self.selection = if self.agents.is_empty() { None } else { Some(0) };
        tracing::info!(path = %path.display(), count, ?mode, "agents imported");
        Ok(count)
    }

    /// Write the collection to `path`, outside the primary file and backups.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    pub fn export(&self, path: &Path) -> Result<()> {
        agent_file::export(self.fs, path, &self.agents)
    }

    /// Persist the collection to the primary file, backing up the previous
    /// file first. Returns the auto backup's name when one was made.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::LoadFailed`] while the primary file that failed
    /// to load is still protected, otherwise see [`agent_file::save`].
    pub fn save(&self) -> Result<Option<BackupName>> {
        self.ensure_loaded()?;
        agent_file::save(self.fs, self.clock, &self.layout, &self.agents)
    }

    /// # Errors
    ///
    /// Returns [`StoreError::LoadFailed`] if the primary file failed to load
    /// and nothing has replaced the fallback collection since.
    pub fn ensure_loaded(&self) -> Result<()> {
        if self.load_failed {
            return Err(StoreError::LoadFailed {
                path: self.layout.agents_file.display().to_string(),
            }
            .into());
        }
        Ok(())
    }

    /// Raw bytes of the primary file as currently on disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read.
    pub fn read_primary(&self) -> Result<Vec<u8>> {
        self.fs.read(&self.layout.agents_file)
    }

    /// Snapshot the in-memory collection. The primary file is not touched.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NothingToBackUp`] when the collection is empty,
    /// or an error if the snapshot cannot be written.
    pub fn create_manual_backup(&self) -> Result<BackupName> {
        backups::create_manual(self.fs, self.clock, &self.layout.backup_dir, &self.agents)
    }

    /// Snapshots, most recent first.
    ///
    /// # Errors
    ///
    /// Returns an error if the backup directory cannot be listed.
    pub fn list_backups(&self) -> Result<Vec<BackupName>> {
        backups::list(self.fs, &self.layout.backup_dir)
    }

    /// Parse a snapshot without applying it.
    ///
    /// # Errors
    ///
    /// See [`backups::read`].
    pub fn read_backup(&self, id: &str) -> Result<Vec<AgentRecord>> {
        backups::read(self.fs, &self.layout.backup_dir, id)
    }

    /// Replace the in-memory collection with a snapshot. The primary file is
    /// not written; call [`AgentStore::save`] to persist. Returns the number
    /// of restored records.
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot cannot be read or parsed or holds a
    /// record violating the persistence invariants; the collection is
    /// unchanged in that case.
    pub fn restore_backup(&mut self, id: &str) -> Result<usize> {
        let restored = self.read_backup(id)?;
        validate_collection(&restored)?;
        let count = restored.len();
        self.set_agents(restored);
        self.load_failed = false;
        tracing::info!(backup = id, count, "backup restored");
        Ok(count)
    }

    /// # Errors
    ///
    /// See [`backups::delete`].
    pub fn delete_backup(&self, id: &str) -> Result<()> {
        backups::delete(self.fs, &self.layout.backup_dir, id)
    }

    /// # Errors
    ///
    /// See [`backups::prune`].
    pub fn prune_backups(&self, max_count: usize) -> Result<Vec<BackupName>> {
        backups::prune(self.fs, &self.layout.backup_dir, max_count)
    }

    fn set_agents(&mut self, agents: Vec<AgentRecord>) {
        self.selection = if agents.is_empty() { None } else { Some(0) };
        self.agents = agents;
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index >= self.agents.len() {
            return Err(StoreError::IndexOutOfRange {
                position: index + 1,
                len: self.agents.len(),
            }
            .into());
        }
        Ok(())
    }
}
