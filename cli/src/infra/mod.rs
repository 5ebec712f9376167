//! Infrastructure layer: concrete implementations of application port traits.
//!
//! All I/O lives here: the filesystem, the wall clock, the YAML config file,
//! and the remote contents API.
//!
//! Imports from `crate::domain` and `crate::application::ports` are allowed.
//! Imports from `crate::commands` or `crate::output` are forbidden.

pub mod clock;
pub mod config;
pub mod fs;
pub mod remote;
