//! Tests for Engine
//!
//! These tests verify:
//! - Opening with and without an existing snapshot
//! - Dirty tracking across mutations and saves
//! - Save on close
//! - Concurrent access through a shared engine

use std::fs;
use std::sync::Arc;
use std::thread;

use jsonkv::config::{Config, SaveMode};
use jsonkv::engine::Engine;
use jsonkv::{snapshot, KeyPattern, KvError, Store};
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

fn setup_temp_engine() -> (TempDir, Engine) {
    let temp_dir = TempDir::new().unwrap();
    let config = Config::builder()
        .snapshot_path(temp_dir.path().join("store.json"))
        .build();
    let engine = Engine::open(config).unwrap();
    (temp_dir, engine)
}

// =============================================================================
// Open Tests
// =============================================================================

#[test]
fn test_open_missing_snapshot_starts_empty() {
    let (temp, engine) = setup_temp_engine();

    assert!(engine.store().is_empty());
    assert!(!engine.is_dirty());
    // Nothing is written until the first save
    assert!(!temp.path().join("store.json").exists());
}

#[test]
fn test_open_missing_snapshot_without_create_fails() {
    let temp_dir = TempDir::new().unwrap();
    let config = Config::builder()
        .snapshot_path(temp_dir.path().join("missing.json"))
        .create_if_missing(false)
        .build();

    let result = Engine::open(config);

    assert!(matches!(result, Err(KvError::Io(_))));
}

#[test]
fn test_open_existing_snapshot() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("existing.json");
    fs::write(&path, r#"{"a":"1","b":"2"}"#).unwrap();

    let engine = Engine::open_path(&path).unwrap();

    assert_eq!(engine.get::<i32>("b").unwrap(), 2);
    assert_eq!(engine.snapshot_path(), path.as_path());
    assert!(!engine.is_dirty());
}

#[test]
fn test_open_corrupt_snapshot_fails() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("corrupt.json");
    fs::write(&path, "not json").unwrap();

    assert!(matches!(Engine::open_path(&path), Err(KvError::Format(_))));
}

#[test]
fn test_open_rejects_bad_compression_level() {
    let temp_dir = TempDir::new().unwrap();
    let config = Config::builder()
        .snapshot_path(temp_dir.path().join("store.json.gz"))
        .compression_level(42)
        .build();

    assert!(matches!(Engine::open(config), Err(KvError::Config(_))));
}

// =============================================================================
// Dirty Tracking Tests
// =============================================================================

#[test]
fn test_set_marks_dirty_and_save_clears() {
    let (_temp, engine) = setup_temp_engine();

    engine.set("key", "value").unwrap();
    assert!(engine.is_dirty());

    let info = engine.save().unwrap();
    assert_eq!(info.entry_count, 1);
    assert!(!engine.is_dirty());
}

#[test]
fn test_failed_set_does_not_mark_dirty() {
    let (_temp, engine) = setup_temp_engine();

    let mut bad = std::collections::HashMap::new();
    bad.insert(vec![1u8], 1);

    assert!(engine.set("bad", &bad).is_err());
    assert!(!engine.is_dirty());
}

#[test]
fn test_delete_absent_key_stays_clean() {
    let (_temp, engine) = setup_temp_engine();

    assert!(!engine.delete("nothing"));
    assert!(!engine.is_dirty());

    engine.set("k", &1).unwrap();
    engine.save().unwrap();
    assert!(engine.delete("k"));
    assert!(engine.is_dirty());
}

#[test]
fn test_save_if_dirty() {
    let (temp, engine) = setup_temp_engine();

    assert!(engine.save_if_dirty().unwrap().is_none());
    assert!(!temp.path().join("store.json").exists());

    engine.set("k", &1).unwrap();
    assert!(engine.save_if_dirty().unwrap().is_some());
    assert!(engine.save_if_dirty().unwrap().is_none());
}

#[test]
fn test_failed_save_keeps_dirty() {
    let temp_dir = TempDir::new().unwrap();
    let target = temp_dir.path().join("blocked");
    let engine = Engine::open_path(&target).unwrap();
    fs::create_dir(&target).unwrap();
    fs::write(target.join("inner"), "x").unwrap();

    engine.set("k", &1).unwrap();

    assert!(engine.save().is_err());
    assert!(engine.is_dirty());
    assert_eq!(engine.get::<i32>("k").unwrap(), 1);
}

// =============================================================================
// Persistence Tests
// =============================================================================

#[test]
fn test_save_creates_parent_directories() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("nested").join("dir").join("store.json.gz");

    let engine = Engine::open_path(&path).unwrap();
    engine.set("k", "v").unwrap();
    engine.save().unwrap();

    assert!(path.exists());
    assert_eq!(snapshot::load(&path).unwrap().get::<String>("k").unwrap(), "v");
}

#[test]
fn test_close_saves_pending_changes() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("store.json");

    {
        let engine = Engine::open_path(&path).unwrap();
        engine.set("persisted", &true).unwrap();
        engine.close().unwrap();
    }

    let engine = Engine::open_path(&path).unwrap();
    assert!(engine.get::<bool>("persisted").unwrap());
}

#[test]
fn test_close_without_save_on_close() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("store.json");
    let config = Config::builder()
        .snapshot_path(&path)
        .save_on_close(false)
        .build();

    let engine = Engine::open(config).unwrap();
    engine.set("lost", &1).unwrap();
    engine.close().unwrap();

    assert!(!path.exists());
}

#[test]
fn test_in_place_mode_round_trip() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("store.json");
    let config = Config::builder()
        .snapshot_path(&path)
        .save_mode(SaveMode::InPlace)
        .build();

    let engine = Engine::open(config.clone()).unwrap();
    engine.set("mode", "in-place").unwrap();
    engine.close().unwrap();

    let engine = Engine::open(config).unwrap();
    assert_eq!(engine.get::<String>("mode").unwrap(), "in-place");
}

#[test]
fn test_engine_enumeration_delegates_to_store() {
    let (_temp, engine) = setup_temp_engine();

    engine.set("user:1", "ann").unwrap();
    engine.set("user:2", "bob").unwrap();
    engine.set("group:1", "admins").unwrap();

    let users = engine.get_all(Some(&KeyPattern::prefix("user:")), None);
    assert_eq!(users.len(), 2);
    assert_eq!(engine.keys().len(), 3);
    assert_eq!(engine.get_raw("group:1").unwrap().as_text(), "\"admins\"");
}

#[test]
fn test_store_accessor_shares_data() {
    let (_temp, engine) = setup_temp_engine();

    engine.store().set("direct", &1).unwrap();

    assert_eq!(engine.get::<i32>("direct").unwrap(), 1);
    // Direct store access bypasses dirty tracking
    assert!(!engine.is_dirty());
}

#[test]
fn test_default_config() {
    let config = Config::default();

    assert_eq!(config.save_mode, SaveMode::Atomic);
    assert_eq!(config.compression_level, 6);
    assert!(config.create_if_missing);
    assert!(config.save_on_close);
}

// =============================================================================
// Concurrent Access Tests
// =============================================================================

#[test]
fn test_engine_concurrent_writes_then_save() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("store.json.gz");
    let engine = Arc::new(Engine::open_path(&path).unwrap());

    // Spawn multiple writer threads
    let mut handles = vec![];
    for t in 0..4 {
        let engine_clone = Arc::clone(&engine);
        handles.push(thread::spawn(move || {
            for i in 0..25 {
                let key = format!("thread{}_key{}", t, i);
                let value = format!("thread{}_value{}", t, i);
                engine_clone.set(key, &value).unwrap();
            }
        }));
    }

    for handle in handles {
        handle.join().unwrap();
    }

    engine.save().unwrap();
    let loaded: Store = snapshot::load(&path).unwrap();

    // Verify all writes succeeded
    assert_eq!(loaded.len(), 100);
    for t in 0..4 {
        for i in 0..25 {
            let key = format!("thread{}_key{}", t, i);
            let expected = format!("thread{}_value{}", t, i);
            assert_eq!(loaded.get::<String>(&key).unwrap(), expected);
        }
    }
}

#[test]
fn test_saves_concurrent_with_writes_are_consistent() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("store.json");
    let engine = Arc::new(Engine::open_path(&path).unwrap());

    let writer = {
        let engine = Arc::clone(&engine);
        thread::spawn(move || {
            for i in 0..200 {
                engine.set(format!("k{}", i), &i).unwrap();
            }
        })
    };

    for _ in 0..10 {
        engine.save().unwrap();
        // Every intermediate snapshot is a complete, loadable file
        let snap = snapshot::load(&path).unwrap();
        for key in snap.keys() {
            let n: i32 = snap.get(&key).unwrap();
            assert_eq!(key, format!("k{}", n));
        }
    }

    writer.join().unwrap();
    engine.save_if_dirty().unwrap();

    assert_eq!(snapshot::load(&path).unwrap().len(), 200);
}
