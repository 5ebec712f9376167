//! Backup snapshot naming and rotation policy: pure functions, no I/O.
//!
//! A backup file is named `agents_<kind>_<YYYYMMDD_HHMMSS>[_<n>].json`.
//! The stamp is fixed-width, so ordering by `(stamp, n)` is chronological.

use std::cmp::Ordering;
use std::fmt;
use std::sync::LazyLock;

use anyhow::Result;
use chrono::NaiveDateTime;
use regex::Regex;
use serde::Serialize;

use crate::domain::error::BackupError;

/// `strftime` format of the stamp embedded in backup names.
pub const STAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Default number of backups kept by rotation.
pub const DEFAULT_MAX_BACKUPS: usize = 30;

/// Matches every file name this program writes into the backup directory.
/// Checked before a user-supplied id is joined onto the directory path.
pub static BACKUP_NAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    // Safety: this is a compile-time constant pattern and cannot fail.
    #[allow(clippy::expect_used)]
    Regex::new(r"^agents_(auto_backup|backup|error)_([0-9]{8}_[0-9]{6})(?:_([0-9]{1,6}))?\.json$")
        .expect("valid regex")
});

/// Why a snapshot was taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BackupKind {
    /// Requested explicitly by the user.
    Manual,
    /// Copy of the primary file taken right before a save overwrote it.
    Auto,
    /// Copy of a primary file that failed to parse.
    Quarantine,
}

impl BackupKind {
    fn infix(self) -> &'static str {
        match self {
            Self::Manual => "backup",
            Self::Auto => "auto_backup",
            Self::Quarantine => "error",
        }
    }

    fn from_infix(infix: &str) -> Option<Self> {
        match infix {
            "backup" => Some(Self::Manual),
            "auto_backup" => Some(Self::Auto),
            "error" => Some(Self::Quarantine),
            _ => None,
        }
    }

    /// Label used in listings.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Manual => "manual",
            Self::Auto => "auto",
            Self::Quarantine => "quarantine",
        }
    }
}

/// Parsed backup file name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupName {
    pub kind: BackupKind,
    /// `YYYYMMDD_HHMMSS`
    pub stamp: String,
    /// Collision counter; 0 means no suffix.
    pub seq: u32,
}

impl BackupName {
    /// Name for a snapshot taken at `at`.
    #[must_use]
    pub fn new(kind: BackupKind, at: &NaiveDateTime) -> Self {
        Self {
            kind,
            stamp: at.format(STAMP_FORMAT).to_string(),
            seq: 0,
        }
    }

    /// Same snapshot name with the collision counter set to `seq`.
    #[must_use]
    pub fn with_seq(&self, seq: u32) -> Self {
        Self {
            seq,
            ..self.clone()
        }
    }

    /// Parse a file name; `None` for files this program did not write.
    #[must_use]
    pub fn parse(file_name: &str) -> Option<Self> {
        let caps = BACKUP_NAME_RE.captures(file_name)?;
        let kind = BackupKind::from_infix(caps.get(1)?.as_str())?;
        let stamp = caps.get(2)?.as_str().to_string();
        let seq = match caps.get(3) {
            Some(m) => m.as_str().parse().ok()?,
            None => 0,
        };
        Some(Self { kind, stamp, seq })
    }

    /// The file name (the backup id).
    #[must_use]
    pub fn file_name(&self) -> String {
        if self.seq == 0 {
            format!("agents_{}_{}.json", self.kind.infix(), self.stamp)
        } else {
            format!("agents_{}_{}_{}.json", self.kind.infix(), self.stamp, self.seq)
        }
    }

    /// When the snapshot was taken, if the stamp is a real calendar time.
    #[must_use]
    pub fn taken_at(&self) -> Option<NaiveDateTime> {
        NaiveDateTime::parse_from_str(&self.stamp, STAMP_FORMAT).ok()
    }
}

impl fmt::Display for BackupName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.file_name())
    }
}

impl Ord for BackupName {
    /// Chronological: stamp, then collision counter, then kind.
    fn cmp(&self, other: &Self) -> Ordering {
        self.stamp
            .cmp(&other.stamp)
            .then(self.seq.cmp(&other.seq))
            .then_with(|| self.kind.infix().cmp(other.kind.infix()))
    }
}

impl PartialOrd for BackupName {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Validate an id supplied from outside (CLI argument).
///
/// # Errors
///
/// Returns [`BackupError::InvalidName`] if `id` is not a backup file name.
pub fn parse_backup_id(id: &str) -> Result<BackupName> {
    BackupName::parse(id).ok_or_else(|| BackupError::InvalidName(id.to_string()).into())
}

/// Keep only recognised backup names, most recent first.
#[must_use]
pub fn newest_first<I, S>(file_names: I) -> Vec<BackupName>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut names: Vec<BackupName> = file_names
        .into_iter()
        .filter_map(|n| BackupName::parse(n.as_ref()))
        .collect();
    names.sort_by(|a, b| b.cmp(a));
    names
}

/// Backups to delete so that at most `max_count` remain, oldest first.
///
/// `sorted` must be ordered most recent first, as [`newest_first`] returns.
#[must_use]
pub fn prune_plan(sorted: &[BackupName], max_count: usize) -> Vec<BackupName> {
    if sorted.len() <= max_count {
        return Vec::new();
    }
    sorted[max_count..].iter().rev().cloned().collect()
}

// ── Unit tests ───────────────────────────────────────────────────────────────
