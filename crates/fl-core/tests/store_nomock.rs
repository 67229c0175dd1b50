//! No-mock repository tests against real files on disk.
//!
//! Covers:
//! - Append then reload through the JSON-lines log
//! - Tolerance of blank and malformed lines
//! - Engine analyses driven from a repository

use std::fs;
use std::io::Write;

use chrono::Duration;
use fl_core::store::{FingerprintRepository, JsonlLogStore, MemoryRepository};
use fl_core::test_utils::{base_time, four_device_stream};
use fl_core::Engine;
use tempfile::TempDir;

fn populated_store(dir: &TempDir) -> JsonlLogStore {
    let mut store = JsonlLogStore::new(dir.path().join("logs").join("fingerprints.jsonl"));
    for record in four_device_stream() {
        store.append(&record).expect("append");
    }
    store
}

#[test]
fn test_appended_records_reload_in_order() {
    let dir = TempDir::new().expect("tempdir");
    let store = populated_store(&dir);

    let loaded = store.load_all().expect("load");
    assert_eq!(loaded, four_device_stream());

    let text = fs::read_to_string(store.path()).expect("read log");
    assert_eq!(text.lines().count(), 7);
}

#[test]
fn test_missing_log_is_empty() {
    let dir = TempDir::new().expect("tempdir");
    let store = JsonlLogStore::new(dir.path().join("absent.jsonl"));
    assert!(!store.exists());
    assert!(store.load_all().expect("load").is_empty());
}

#[test]
fn test_bad_lines_are_skipped_and_reported() {
    let dir = TempDir::new().expect("tempdir");
    let store = populated_store(&dir);
    {
        let mut file = fs::OpenOptions::new()
            .append(true)
            .open(store.path())
            .expect("open log");
        writeln!(file).expect("blank line");
        writeln!(file, "{{not json").expect("garbage line");
        writeln!(file, r#"{{"id": "no-timestamp", "sessionId": "s"}}"#).expect("partial line");
    }

    let report = store.load_report().expect("load");
    assert_eq!(report.records.len(), 7);
    assert_eq!(report.skipped_lines, vec![9, 10]);
}

#[test]
fn test_reset_truncates() {
    let dir = TempDir::new().expect("tempdir");
    let store = populated_store(&dir);
    store.reset().expect("reset");
    assert!(store.exists());
    assert!(store.load_all().expect("load").is_empty());
}

#[test]
fn test_engine_reads_file_and_memory_repositories_alike() {
    let dir = TempDir::new().expect("tempdir");
    let file_store = populated_store(&dir);
    let memory = MemoryRepository::from(four_device_stream());

    let engine = Engine::default();
    let now = base_time() + Duration::hours(2);

    let from_file = engine.stats_from(&file_store, now).expect("file stats");
    let from_memory = engine.stats_from(&memory, now).expect("memory stats");
    assert_eq!(from_file, from_memory);
    assert_eq!(from_file.unique_devices, 4);

    let entropy = engine.entropy_from(&file_store).expect("entropy");
    assert_eq!(entropy.summary.total_entries, 7);
    assert!(entropy.component_entropies.contains_key("canvas"));

    let snapshot = engine.analytics_from(&file_store, now).expect("analytics");
    assert_eq!(snapshot.recent_fingerprints.len(), 7);
}

#[test]
fn test_recent_window_excludes_old_records() {
    let dir = TempDir::new().expect("tempdir");
    let store = populated_store(&dir);
    let engine = Engine::default();

    let stats = engine
        .stats_from(&store, base_time() + Duration::days(3))
        .expect("stats");
    assert_eq!(stats.total_fingerprints, 7);
    assert_eq!(stats.recent_activity, 0);
}
