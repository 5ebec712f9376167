//! Command implementations

pub mod agents;
pub mod backup;
pub mod config;
pub mod keys;
pub mod sync;
pub mod version;
