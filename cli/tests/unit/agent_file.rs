//! Loading and saving the primary agents file.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use agent_editor_cli::application::services::agent_file::{self, LoadOutcome};
use agent_editor_cli::domain::error::StoreError;
use agent_editor_cli::infra::fs::LocalFs;

use super::helpers::{FaultyFs, FixedClock, Workspace, agent};

#[test]
fn load_missing_file_creates_empty_array() {
    let ws = Workspace::new();
    let loaded = agent_file::load(&LocalFs, &FixedClock::default(), &ws.layout);
    assert!(matches!(loaded.outcome, LoadOutcome::Created));
    assert!(loaded.agents.is_empty());
    assert_eq!(ws.read_primary().trim(), "[]");
}

#[test]
fn load_missing_file_creates_parent_directories() {
    let ws = Workspace::new();
    let mut layout = ws.layout.clone();
    layout.agents_file = ws.root.join("nested").join("deeper").join("agents.json");
    let loaded = agent_file::load(&LocalFs, &FixedClock::default(), &layout);
    assert!(matches!(loaded.outcome, LoadOutcome::Created));
    assert!(layout.agents_file.exists());
}

#[test]
fn load_zero_length_file_is_empty_and_untouched() {
    let ws = Workspace::new();
    ws.write_primary("");
    let loaded = agent_file::load(&LocalFs, &FixedClock::default(), &ws.layout);
    assert!(matches!(loaded.outcome, LoadOutcome::Empty));
    assert!(loaded.agents.is_empty());
    assert_eq!(ws.read_primary(), "");
    assert!(ws.backup_files().is_empty());
}

#[test]
fn load_valid_file_returns_records_in_order() {
    let ws = Workspace::new();
    ws.write_agents(&[agent("1", "Tutor"), agent("2", "Poet")]);
    let loaded = agent_file::load(&LocalFs, &FixedClock::default(), &ws.layout);
    assert!(matches!(loaded.outcome, LoadOutcome::Loaded(2)));
    let names: Vec<&str> = loaded.agents.iter().map(|a| a.name.as_str()).collect();
    assert_eq!(names, ["Tutor", "Poet"]);
}

#[test]
fn load_invalid_json_quarantines_bytes_and_resets_file() {
    let ws = Workspace::new();
    ws.write_primary("[{\"id\": \"1\", \"name\": ");
    let loaded = agent_file::load(&LocalFs, &FixedClock::default(), &ws.layout);

    let LoadOutcome::Quarantined { backup, .. } = &loaded.outcome else {
        panic!("expected quarantine, got {:?}", loaded.outcome);
    };
    assert_eq!(backup.file_name(), "agents_error_20261019_093000.json");
    assert_eq!(
        ws.backup_content(&backup.file_name()),
        "[{\"id\": \"1\", \"name\": "
    );
    assert!(loaded.agents.is_empty());
    assert_eq!(ws.read_primary().trim(), "[]");
}

#[test]
fn load_invalid_json_keeps_file_when_quarantine_copy_fails() {
    let ws = Workspace::new();
    ws.write_primary("{not json");
    let fs = FaultyFs::default();
    fs.fail_copy.set(true);
    let loaded = agent_file::load(&fs, &FixedClock::default(), &ws.layout);
    assert!(matches!(loaded.outcome, LoadOutcome::Failed(_)));
    assert_eq!(ws.read_primary(), "{not json");
}

#[test]
fn load_wrong_shape_fails_without_touching_file() {
    let ws = Workspace::new();
    ws.write_primary(r#"{"id": "1", "name": "not in an array"}"#);
    let loaded = agent_file::load(&LocalFs, &FixedClock::default(), &ws.layout);
    let LoadOutcome::Failed(err) = &loaded.outcome else {
        panic!("expected failure, got {:?}", loaded.outcome);
    };
    assert!(matches!(
        err.downcast_ref::<StoreError>(),
        Some(StoreError::MalformedShape { .. })
    ));
    assert!(loaded.agents.is_empty());
    assert!(ws.read_primary().contains("not in an array"));
    assert!(ws.backup_files().is_empty());
}

#[test]
fn load_read_failure_is_reported() {
    let ws = Workspace::new();
    ws.write_primary("[]");
    let fs = FaultyFs::default();
    fs.fail_read.set(true);
    let loaded = agent_file::load(&fs, &FixedClock::default(), &ws.layout);
    assert!(matches!(loaded.outcome, LoadOutcome::Failed(_)));
}

#[test]
fn save_backs_up_previous_file_verbatim_before_writing() {
    let ws = Workspace::new();
    let previous = "[\n  {\"id\": \"old\", \"name\": \"Old\"}\n]";
    ws.write_primary(previous);

    let backup = agent_file::save(
        &LocalFs,
        &FixedClock::default(),
        &ws.layout,
        &[agent("1", "New")],
    )
    .unwrap()
    .expect("backup made");

    assert_eq!(backup.file_name(), "agents_auto_backup_20261019_093000.json");
    assert_eq!(ws.backup_content(&backup.file_name()), previous);
    assert_eq!(ws.primary_agents(), vec![agent("1", "New")]);
}

#[test]
fn save_without_existing_file_makes_no_backup() {
    let ws = Workspace::new();
    let backup = agent_file::save(
        &LocalFs,
        &FixedClock::default(),
        &ws.layout,
        &[agent("1", "New")],
    )
    .unwrap();
    assert!(backup.is_none());
    assert!(ws.backup_files().is_empty());
}

#[test]
fn save_writes_two_space_indent_literal_unicode_and_newline() {
    let ws = Workspace::new();
    agent_file::save(
        &LocalFs,
        &FixedClock::default(),
        &ws.layout,
        &[agent("1", "翻译助手")],
    )
    .unwrap();
    let text = ws.read_primary();
    assert!(text.starts_with("[\n  {\n    \"id\": \"1\""), "got: {text}");
    assert!(text.contains("翻译助手"));
    assert!(text.ends_with("]\n"));
}

#[test]
fn save_does_not_write_when_backup_fails() {
    let ws = Workspace::new();
    ws.write_primary("[]");
    let fs = FaultyFs::default();
    fs.fail_copy.set(true);
    let err = agent_file::save(&fs, &FixedClock::default(), &ws.layout, &[agent("1", "A")])
        .unwrap_err();
    assert!(format!("{err:#}").contains("not written"), "got: {err:#}");
    assert_eq!(ws.read_primary(), "[]");
}

#[test]
fn save_write_failure_keeps_backup() {
    let ws = Workspace::new();
    ws.write_primary("[]");
    let fs = FaultyFs::default();
    fs.fail_write.set(true);
    let res = agent_file::save(&fs, &FixedClock::default(), &ws.layout, &[agent("1", "A")]);
    assert!(res.is_err());
    assert_eq!(ws.backup_files(), ["agents_auto_backup_20261019_093000.json"]);
    assert_eq!(ws.read_primary(), "[]");
}

#[test]
fn save_rejects_invalid_record_without_side_effects() {
    let ws = Workspace::new();
    ws.write_primary("[]");
    let err = agent_file::save(
        &LocalFs,
        &FixedClock::default(),
        &ws.layout,
        &[agent("1", "A"), agent("2", "   ")],
    )
    .unwrap_err();
    assert!(matches!(
        err.downcast_ref::<StoreError>(),
        Some(StoreError::EmptyName { position: 2 })
    ));
    assert!(ws.backup_files().is_empty());
    assert_eq!(ws.read_primary(), "[]");
}

#[test]
fn save_then_load_preserves_unknown_keys() {
    let ws = Workspace::new();
    ws.write_primary(r#"[{"id":"1","name":"A","avatar":"cat.png","maxTokens":99}]"#);
    let clock = FixedClock::default();
    let loaded = agent_file::load(&LocalFs, &clock, &ws.layout);
    agent_file::save(&LocalFs, &clock, &ws.layout, &loaded.agents).unwrap();
    let text = ws.read_primary();
    assert!(text.contains("\"avatar\": \"cat.png\""), "got: {text}");
    assert!(text.contains("\"max_tokens\": 99"), "got: {text}");
}

#[test]
fn import_rejects_non_array_and_invalid_records() {
    let ws = Workspace::new();
    let path = ws.root.join("incoming.json");

    std::fs::write(&path, r#"{"id":"1","name":"A"}"#).unwrap();
    assert!(agent_file::read_import(&LocalFs, &path).is_err());

    std::fs::write(&path, r#"[{"id":"","name":"A"}]"#).unwrap();
    assert!(agent_file::read_import(&LocalFs, &path).is_err());

    std::fs::write(&path, r#"[{"name":"no id"}]"#).unwrap();
    assert!(agent_file::read_import(&LocalFs, &path).is_err());
}
