//! Application service: push the agents file to the remote contents API.

use anyhow::{Context, Result};

use crate::application::ports::{Clock, ContentApi, ContentUpdate, LocalFs, ProgressReporter};
use crate::application::services::agent_store::AgentStore;
use crate::domain::backup::BackupName;
use crate::domain::config::RemoteConfig;
use crate::domain::error::SyncError;

/// `strftime` format of the timestamp in commit messages.
pub const COMMIT_STAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// What a successful sync did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncOutcome {
    /// `true` when the remote file did not exist before.
    pub created: bool,
    /// Auto backup made by the local save, if any.
    pub backup: Option<BackupName>,
}

/// Commit message for a push made at the clock's current time.
#[must_use]
pub fn commit_message(clock: &impl Clock) -> String {
    format!(
        "Update agents.json via Agent Editor - {}",
        clock.now().format(COMMIT_STAMP_FORMAT)
    )
}

/// Save the store locally, then upload the saved file.
///
/// The remote revision marker is fetched first: an existing file is updated
/// in place with that marker, a missing one is created without it. Failures
/// are returned as-is and never retried.
///
/// # Errors
///
/// Returns [`SyncError::NotConfigured`] when owner or repository is unset,
/// [`StoreError::LoadFailed`] when the local file could not be loaded, or
/// any save, read, or API error. Nothing is written or uploaded in the
/// first two cases.
///
/// [`StoreError::LoadFailed`]: crate::domain::error::StoreError::LoadFailed
pub fn sync_agents<F: LocalFs, C: Clock>(
    store: &AgentStore<'_, F, C>,
    api: &impl ContentApi,
    remote: &RemoteConfig,
    clock: &C,
    reporter: &impl ProgressReporter,
) -> Result<SyncOutcome> {
    if !remote.is_configured() {
        return Err(SyncError::NotConfigured.into());
    }
    store.ensure_loaded()?;

    reporter.step("saving agents locally...");
    let backup = store.save().context("saving before sync")?;
    let content = store.read_primary()?;

    reporter.step(&format!(
        "checking {}/{}:{} on branch {}...",
        remote.owner, remote.repo, remote.file_path, remote.branch
    ));
    let revision = api.fetch_revision(remote)?;
    let created = revision.is_none();
    tracing::debug!(?revision, "remote revision fetched");

    reporter.step("uploading...");
    let update = ContentUpdate {
        message: commit_message(clock),
        content,
        revision,
    };
    api.put_content(remote, &update)?;

    reporter.success(&format!(
        "synced {} agents to {}/{} ({})",
        store.len(),
        remote.owner,
        remote.repo,
        remote.branch
    ));
    Ok(SyncOutcome { created, backup })
}
