//! `AgentStore` mutations, selection rules and backup operations.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use agent_editor_cli::application::services::agent_file::LoadOutcome;
use agent_editor_cli::application::services::agent_store::{AgentStore, ImportMode};
use agent_editor_cli::domain::error::{BackupError, StoreError};
use agent_editor_cli::infra::fs::LocalFs;
use agent_editor_common::PLACEHOLDER_API_KEY;

use super::helpers::{FixedClock, GOOD_KEY, Workspace, agent};

fn open<'a>(ws: &Workspace, fs: &'a LocalFs, clock: &'a FixedClock) -> AgentStore<'a, LocalFs, FixedClock> {
    let (store, _report) = AgentStore::open(fs, clock, ws.layout.clone(), 30);
    store
}

fn names(store: &AgentStore<'_, LocalFs, FixedClock>) -> Vec<String> {
    store.agents().iter().map(|a| a.name.clone()).collect()
}

#[test]
fn open_selects_first_record() {
    let ws = Workspace::new();
    ws.write_agents(&[agent("1", "A"), agent("2", "B")]);
    let (fs, clock) = (LocalFs, FixedClock::default());
    let (store, report) = AgentStore::open(&fs, &clock, ws.layout.clone(), 30);
    assert!(matches!(report.load, LoadOutcome::Loaded(2)));
    assert!(report.pruned.unwrap().is_empty());
    assert_eq!(store.selection(), Some(0));
    assert_eq!(store.selected().unwrap().name, "A");
}

#[test]
fn open_empty_file_selects_nothing() {
    let ws = Workspace::new();
    let (fs, clock) = (LocalFs, FixedClock::default());
    let store = open(&ws, &fs, &clock);
    assert!(store.is_empty());
    assert_eq!(store.selection(), None);
    assert!(store.selected().is_none());
}

#[test]
fn open_prunes_backups_before_loading() {
    let ws = Workspace::new();
    ws.write_agents(&[agent("1", "A")]);
    for minute in 0..5 {
        ws.touch_backup(&format!("agents_backup_20260101_00{minute:02}00.json"), "[]");
    }
    let (fs, clock) = (LocalFs, FixedClock::default());
    let (_store, report) = AgentStore::open(&fs, &clock, ws.layout.clone(), 3);
    let pruned: Vec<String> = report.pruned.unwrap().iter().map(|b| b.file_name()).collect();
    assert_eq!(
        pruned,
        [
            "agents_backup_20260101_000000.json",
            "agents_backup_20260101_000100.json"
        ]
    );
    assert_eq!(ws.backup_files().len(), 3);
}

#[test]
fn open_with_thirty_kept_leaves_newest_thirty_of_thirty_five() {
    let ws = Workspace::new();
    ws.write_agents(&[agent("1", "A")]);
    let mut all: Vec<String> = (0..35)
        .map(|i| format!("agents_backup_20260101_{:02}{:02}00.json", i / 60, i % 60))
        .collect();
    for name in &all {
        ws.touch_backup(name, "[]");
    }
    let (fs, clock) = (LocalFs, FixedClock::default());
    let (store, report) = AgentStore::open(&fs, &clock, ws.layout.clone(), 30);

    assert_eq!(report.pruned.unwrap().len(), 5);
    all.sort();
    assert_eq!(ws.backup_files(), all[5..].to_vec());
    assert_eq!(store.list_backups().unwrap().len(), 30);
}

#[test]
fn failed_load_blocks_save_until_overwrite_is_allowed() {
    let ws = Workspace::new();
    let unreadable = r#"[{"id": "1", "name": "A"}, {"name": "B"}]"#;
    ws.write_primary(unreadable);
    let (fs, clock) = (LocalFs, FixedClock::default());
    let (mut store, report) = AgentStore::open(&fs, &clock, ws.layout.clone(), 30);
    assert!(matches!(report.load, LoadOutcome::Failed(_)));
    assert!(!store.loaded_cleanly());

    store.add(agent("2", "New")).unwrap();
    let err = store.save().unwrap_err();
    assert!(matches!(
        err.downcast_ref::<StoreError>(),
        Some(StoreError::LoadFailed { .. })
    ));
    assert_eq!(ws.read_primary(), unreadable);
    assert!(ws.backup_files().is_empty());

    store.allow_overwrite();
    let backup = store.save().unwrap().unwrap();
    assert_eq!(ws.backup_content(&backup.file_name()), unreadable);
    assert_eq!(ws.primary_agents().len(), 1);
}

#[test]
fn clean_load_allows_save() {
    let ws = Workspace::new();
    ws.write_agents(&[agent("1", "A")]);
    let (fs, clock) = (LocalFs, FixedClock::default());
    let store = open(&ws, &fs, &clock);
    assert!(store.loaded_cleanly());
    store.save().unwrap();
}

#[test]
fn restoring_a_backup_after_failed_load_unblocks_save() {
    let ws = Workspace::new();
    ws.touch_backup(
        "agents_backup_20261018_120000.json",
        &serde_json::to_string(&[agent("1", "A")]).unwrap(),
    );
    ws.write_primary(r#"{"id": "1"}"#);
    let (fs, clock) = (LocalFs, FixedClock::default());
    let mut store = open(&ws, &fs, &clock);
    assert!(!store.loaded_cleanly());

    store
        .restore_backup("agents_backup_20261018_120000.json")
        .unwrap();
    assert!(store.loaded_cleanly());
    store.save().unwrap();
    assert_eq!(names(&store), ["A"]);
    assert_eq!(ws.primary_agents().len(), 1);
}

#[test]
fn add_appends_and_selects_new_record() {
    let ws = Workspace::new();
    ws.write_agents(&[agent("1", "A")]);
    let (fs, clock) = (LocalFs, FixedClock::default());
    let mut store = open(&ws, &fs, &clock);
    let index = store.add(agent("2", "B")).unwrap();
    assert_eq!(index, 1);
    assert_eq!(store.selection(), Some(1));
    assert_eq!(names(&store), ["A", "B"]);
}

#[test]
fn add_rejects_blank_id_and_leaves_store_unchanged() {
    let ws = Workspace::new();
    let (fs, clock) = (LocalFs, FixedClock::default());
    let mut store = open(&ws, &fs, &clock);
    let err = store.add(agent(" ", "A")).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<StoreError>(),
        Some(StoreError::EmptyId { position: 1 })
    ));
    assert!(store.is_empty());
    assert_eq!(store.selection(), None);
}

#[test]
fn template_copies_first_key_or_uses_placeholder() {
    let ws = Workspace::new();
    let (fs, clock) = (LocalFs, FixedClock::default());
    let mut store = open(&ws, &fs, &clock);

    let first = store.new_record_template();
    assert_eq!(first.id, "1");
    assert_eq!(first.api_key_variable_name, PLACEHOLDER_API_KEY);

    store.add(agent("x", "X")).unwrap();
    let second = store.new_record_template();
    assert_eq!(second.id, "2");
    assert_eq!(second.name, "New Agent 2");
    assert_eq!(second.api_key_variable_name, GOOD_KEY);
}

#[test]
fn duplicate_marks_copy_and_selects_it() {
    let ws = Workspace::new();
    ws.write_agents(&[agent("tutor", "Tutor"), agent("poet", "Poet")]);
    let (fs, clock) = (LocalFs, FixedClock::default());
    let mut store = open(&ws, &fs, &clock);
    let copy = store.duplicate(0).unwrap();
    assert_eq!(copy, 2);
    assert_eq!(store.selection(), Some(2));
    let record = store.get(2).unwrap();
    assert_eq!(record.id, "tutor_copy");
    assert_eq!(record.name, "Tutor (copy)");
    assert_eq!(record.model, store.get(0).unwrap().model);
}

#[test]
fn delete_moves_selection_to_following_record() {
    let ws = Workspace::new();
    ws.write_agents(&[agent("1", "A"), agent("2", "B"), agent("3", "C")]);
    let (fs, clock) = (LocalFs, FixedClock::default());
    let mut store = open(&ws, &fs, &clock);

    let removed = store.delete(1).unwrap();
    assert_eq!(removed.name, "B");
    assert_eq!(store.selection(), Some(1));
    assert_eq!(store.selected().unwrap().name, "C");

    store.delete(1).unwrap();
    assert_eq!(store.selection(), Some(0));

    store.delete(0).unwrap();
    assert_eq!(store.selection(), None);
}

#[test]
fn out_of_range_index_is_an_error() {
    let ws = Workspace::new();
    ws.write_agents(&[agent("1", "A")]);
    let (fs, clock) = (LocalFs, FixedClock::default());
    let mut store = open(&ws, &fs, &clock);
    for err in [
        store.select(1).unwrap_err(),
        store.duplicate(5).unwrap_err(),
        store.delete(1).unwrap_err(),
        store.replace(3, agent("x", "X")).unwrap_err(),
    ] {
        assert!(matches!(
            err.downcast_ref::<StoreError>(),
            Some(StoreError::IndexOutOfRange { len: 1, .. })
        ));
    }
    assert_eq!(names(&store), ["A"]);
}

#[test]
fn replace_keeps_selection() {
    let ws = Workspace::new();
    ws.write_agents(&[agent("1", "A"), agent("2", "B")]);
    let (fs, clock) = (LocalFs, FixedClock::default());
    let mut store = open(&ws, &fs, &clock);
    store.select(0).unwrap();
    store.replace(1, agent("2", "Bee")).unwrap();
    assert_eq!(store.selection(), Some(0));
    assert_eq!(names(&store), ["A", "Bee"]);
}

#[test]
fn replace_rejects_invalid_record() {
    let ws = Workspace::new();
    ws.write_agents(&[agent("1", "A")]);
    let (fs, clock) = (LocalFs, FixedClock::default());
    let mut store = open(&ws, &fs, &clock);
    let mut bad = agent("1", "A");
    bad.temperature = f64::NAN;
    assert!(store.replace(0, bad).is_err());
    let mut bad = agent("1", "A");
    bad.max_tokens = 0;
    assert!(store.replace(0, bad).is_err());
    assert_eq!(store.get(0).unwrap(), &agent("1", "A"));
}

#[test]
fn import_replace_and_append() {
    let ws = Workspace::new();
    ws.write_agents(&[agent("1", "A")]);
    let incoming = ws.root.join("incoming.json");
    std::fs::write(
        &incoming,
        serde_json::to_string(&[agent("9", "Z"), agent("8", "Y")]).unwrap(),
    )
    .unwrap();
    let (fs, clock) = (LocalFs, FixedClock::default());

    let mut store = open(&ws, &fs, &clock);
    assert_eq!(store.import(&incoming, ImportMode::Append).unwrap(), 2);
    assert_eq!(names(&store), ["A", "Z", "Y"]);
    assert_eq!(store.selection(), Some(0));

    let mut store = open(&ws, &fs, &clock);
    store.import(&incoming, ImportMode::Replace).unwrap();
    assert_eq!(names(&store), ["Z", "Y"]);
}

#[test]
fn failed_import_applies_nothing() {
    let ws = Workspace::new();
    ws.write_agents(&[agent("1", "A")]);
    let incoming = ws.root.join("bad.json");
    std::fs::write(&incoming, r#"[{"id":"2","name":"B"}, 42]"#).unwrap();
    let (fs, clock) = (LocalFs, FixedClock::default());
    let mut store = open(&ws, &fs, &clock);
    assert!(store.import(&incoming, ImportMode::Replace).is_err());
    assert_eq!(names(&store), ["A"]);
}

#[test]
fn export_writes_collection_without_backups() {
    let ws = Workspace::new();
    ws.write_agents(&[agent("1", "A")]);
    let (fs, clock) = (LocalFs, FixedClock::default());
    let store = open(&ws, &fs, &clock);
    let out = ws.root.join("out").join("shared.json");
    store.export(&out).unwrap();
    let exported: Vec<_> = serde_json::from_str::<serde_json::Value>(
        &std::fs::read_to_string(&out).unwrap(),
    )
    .unwrap()
    .as_array()
    .unwrap()
    .clone();
    assert_eq!(exported.len(), 1);
    assert!(ws.backup_files().is_empty());
}

#[test]
fn manual_backup_snapshots_memory_not_file() {
    let ws = Workspace::new();
    ws.write_agents(&[agent("1", "A")]);
    let (fs, clock) = (LocalFs, FixedClock::default());
    let mut store = open(&ws, &fs, &clock);
    store.add(agent("2", "B")).unwrap();

    let name = store.create_manual_backup().unwrap();
    assert_eq!(name.file_name(), "agents_backup_20261019_093000.json");
    let snapshot: Vec<serde_json::Value> =
        serde_json::from_str(&ws.backup_content(&name.file_name())).unwrap();
    assert_eq!(snapshot.len(), 2);
    assert_eq!(ws.primary_agents().len(), 1);
}

#[test]
fn manual_backup_of_empty_collection_is_refused() {
    let ws = Workspace::new();
    let (fs, clock) = (LocalFs, FixedClock::default());
    let store = open(&ws, &fs, &clock);
    let err = store.create_manual_backup().unwrap_err();
    assert!(matches!(
        err.downcast_ref::<StoreError>(),
        Some(StoreError::NothingToBackUp)
    ));
}

#[test]
fn backups_in_same_second_get_distinct_names() {
    let ws = Workspace::new();
    ws.write_agents(&[agent("1", "A")]);
    let (fs, clock) = (LocalFs, FixedClock::default());
    let store = open(&ws, &fs, &clock);
    let first = store.create_manual_backup().unwrap();
    let second = store.create_manual_backup().unwrap();
    assert_ne!(first, second);
    assert_eq!(second.file_name(), "agents_backup_20261019_093000_1.json");
    let listed = store.list_backups().unwrap();
    assert_eq!(listed[0], second);
}

#[test]
fn restore_replaces_memory_only_until_saved() {
    let ws = Workspace::new();
    ws.write_agents(&[agent("1", "A")]);
    let (fs, clock) = (LocalFs, FixedClock::default());
    let mut store = open(&ws, &fs, &clock);
    let snapshot = store.create_manual_backup().unwrap();

    clock.advance(60);
    store.add(agent("2", "B")).unwrap();
    store.save().unwrap();
    assert_eq!(ws.primary_agents().len(), 2);

    let count = store.restore_backup(&snapshot.file_name()).unwrap();
    assert_eq!(count, 1);
    assert_eq!(store.selection(), Some(0));
    assert_eq!(ws.primary_agents().len(), 2);

    clock.advance(60);
    store.save().unwrap();
    assert_eq!(ws.primary_agents().len(), 1);
}

#[test]
fn restore_of_missing_or_invalid_id_is_an_error() {
    let ws = Workspace::new();
    ws.write_agents(&[agent("1", "A")]);
    let (fs, clock) = (LocalFs, FixedClock::default());
    let mut store = open(&ws, &fs, &clock);

    let err = store
        .restore_backup("agents_backup_20200101_000000.json")
        .unwrap_err();
    assert!(matches!(
        err.downcast_ref::<BackupError>(),
        Some(BackupError::NotFound(_))
    ));

    let err = store.restore_backup("../agents.json").unwrap_err();
    assert!(matches!(
        err.downcast_ref::<BackupError>(),
        Some(BackupError::InvalidName(_))
    ));
    assert_eq!(names(&store), ["A"]);
}

#[test]
fn restore_rejects_snapshot_with_blank_name() {
    let ws = Workspace::new();
    ws.write_agents(&[agent("1", "A")]);
    ws.touch_backup(
        "agents_backup_20261018_120000.json",
        r#"[{"id": "1", "name": "Kept"}, {"id": "2", "name": "  "}]"#,
    );
    let (fs, clock) = (LocalFs, FixedClock::default());
    let mut store = open(&ws, &fs, &clock);

    let err = store
        .restore_backup("agents_backup_20261018_120000.json")
        .unwrap_err();
    assert!(matches!(
        err.downcast_ref::<StoreError>(),
        Some(StoreError::EmptyName { position: 2 })
    ));
    assert_eq!(names(&store), ["A"]);
    assert_eq!(store.selection(), Some(0));
}

#[test]
fn delete_backup_removes_file() {
    let ws = Workspace::new();
    ws.write_agents(&[agent("1", "A")]);
    let (fs, clock) = (LocalFs, FixedClock::default());
    let store = open(&ws, &fs, &clock);
    let name = store.create_manual_backup().unwrap();
    store.delete_backup(&name.file_name()).unwrap();
    assert!(store.list_backups().unwrap().is_empty());
    assert!(store.delete_backup(&name.file_name()).is_err());
}

#[test]
fn save_after_each_edit_leaves_auto_backups_of_each_prior_state() {
    let ws = Workspace::new();
    ws.write_agents(&[agent("1", "A")]);
    let (fs, clock) = (LocalFs, FixedClock::default());
    let mut store = open(&ws, &fs, &clock);

    store.add(agent("2", "B")).unwrap();
    let first = store.save().unwrap().unwrap();
    clock.advance(1);
    store.delete(0).unwrap();
    let second = store.save().unwrap().unwrap();

    let first_snapshot: Vec<serde_json::Value> =
        serde_json::from_str(&ws.backup_content(&first.file_name())).unwrap();
    let second_snapshot: Vec<serde_json::Value> =
        serde_json::from_str(&ws.backup_content(&second.file_name())).unwrap();
    assert_eq!(first_snapshot.len(), 1);
    assert_eq!(second_snapshot.len(), 2);
    assert_eq!(names(&store), ["B"]);
}
