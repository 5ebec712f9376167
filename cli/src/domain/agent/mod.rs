//! Domain logic for agent records: pure functions, no I/O.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `std::fs`, or `std::net`.

pub mod validate;

pub use agent_editor_common::AgentRecord;
pub use validate::{
    ACCEPTED_KEY_PREFIXES, KeyIssue, KeyVerdict, MIN_KEY_LEN, mask_key, validate_api_key,
    validate_collection, validate_record,
};
