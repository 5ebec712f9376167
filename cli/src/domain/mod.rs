//! Domain layer: pure business logic, types, and validation.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `std::fs`, `std::process`, or `std::net`.
//! All functions are synchronous and take data in, returning data out.

pub mod agent;
pub mod backup;
pub mod config;
pub mod error;

pub use agent::{AgentRecord, KeyIssue, KeyVerdict, validate_api_key};
pub use backup::{BackupKind, BackupName};
pub use config::{EditorConfig, RemoteConfig, StoreConfig};
pub use error::{BackupError, ConfigError, StoreError, SyncError};
