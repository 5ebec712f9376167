//! Application services: use-case orchestration.
//!
//! Each service module implements a single use-case by composing domain logic
//! with port trait calls. Services import only from `crate::domain` and
//! `crate::application::ports`, never from `crate::infra`, `crate::commands`,
//! or `crate::output`.

pub mod agent_file;
pub mod agent_store;
pub mod backups;
pub mod config_service;
pub mod key_check;
pub mod remote_sync;
