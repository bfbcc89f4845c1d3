//! Tests for the key/value stores

use tempfile::tempdir;

use crate::error::WidgetError;
use crate::services::{JsonFileStore, MemoryStore};
use crate::traits::KeyValueStore;

#[test]
fn test_memory_store_roundtrip() {
    let store = MemoryStore::new();
    assert_eq!(store.get("k").unwrap(), None);

    store.set("k", "v1").unwrap();
    store.set("k", "v2").unwrap();
    assert_eq!(store.get("k").unwrap().as_deref(), Some("v2"));

    store.remove("k").unwrap();
    assert_eq!(store.get("k").unwrap(), None);
}

#[test]
fn test_file_store_survives_reopen() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nested").join("widget.json");

    {
        let store = JsonFileStore::open(&path).unwrap();
        store.set("ai_chat_widget_thread_abc", "thread_1").unwrap();
        store.set("other", "x").unwrap();
        store.remove("other").unwrap();
    }

    let reopened = JsonFileStore::open(&path).unwrap();
    assert_eq!(
        reopened.get("ai_chat_widget_thread_abc").unwrap().as_deref(),
        Some("thread_1")
    );
    assert_eq!(reopened.get("other").unwrap(), None);
    assert!(!path.with_extension("tmp").exists());
}

#[test]
fn test_file_store_missing_or_empty_file_starts_empty() {
    let dir = tempdir().unwrap();
    let missing = JsonFileStore::open(dir.path().join("absent.json")).unwrap();
    assert_eq!(missing.get("k").unwrap(), None);

    let empty_path = dir.path().join("empty.json");
    std::fs::write(&empty_path, "  ").unwrap();
    assert!(JsonFileStore::open(&empty_path).is_ok());
}

#[test]
fn test_file_store_rejects_corrupt_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("corrupt.json");
    std::fs::write(&path, "{ not json").unwrap();

    assert!(matches!(JsonFileStore::open(&path), Err(WidgetError::Storage { .. })));
}

#[test]
fn test_file_store_keeps_memory_and_disk_in_step_when_a_write_fails() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("widget.json");
    let store = JsonFileStore::open(&path).unwrap();
    store.set("session", "thread_1").unwrap();

    // A directory where the temp file goes makes every flush fail
    let blocker = path.with_extension("tmp");
    std::fs::create_dir(&blocker).unwrap();

    assert!(store.set("session", "thread_2").is_err());
    assert!(store.remove("session").is_err());
    assert_eq!(store.get("session").unwrap().as_deref(), Some("thread_1"));

    std::fs::remove_dir(&blocker).unwrap();
    let reopened = JsonFileStore::open(&path).unwrap();
    assert_eq!(reopened.get("session").unwrap().as_deref(), Some("thread_1"));

    store.set("session", "thread_2").unwrap();
    assert_eq!(store.get("session").unwrap().as_deref(), Some("thread_2"));
}
