//! Integration tests for the leaf record store.
//!
//! File-backed tests run against a [`tempfile::TempDir`] so each test owns
//! an isolated data directory.

#![allow(clippy::unwrap_used)]

use canopy_store::{LeafStore, StorageMode};
use canopy_types::LeafRecord;

fn sample_leaves() -> Vec<LeafRecord> {
    vec![
        LeafRecord::new(0, None, None),
        LeafRecord::new(1, None, Some(String::from("import"))),
        LeafRecord::new(3, None, None),
    ]
}

#[tokio::test]
async fn file_store_round_trips_collection() {
    let dir = tempfile::tempdir().unwrap();
    let store = LeafStore::file(dir.path());

    let leaves = sample_leaves();
    assert!(store.write(&leaves).await);

    let read_back = store.read().await;
    assert_eq!(read_back, leaves);
}

#[tokio::test]
async fn file_store_reads_empty_when_document_absent() {
    let dir = tempfile::tempdir().unwrap();
    let store = LeafStore::file(dir.path());

    assert!(store.read().await.is_empty());
}

#[tokio::test]
async fn file_store_degrades_to_empty_on_corrupt_document() {
    let dir = tempfile::tempdir().unwrap();
    let store = LeafStore::file(dir.path());

    let path = store.data_path().unwrap();
    std::fs::write(&path, b"{not json").unwrap();

    assert!(store.read().await.is_empty());
    // The corrupt document stays on disk until the next successful write.
    assert!(path.exists());
}

#[tokio::test]
async fn file_store_write_replaces_prior_state() {
    let dir = tempfile::tempdir().unwrap();
    let store = LeafStore::file(dir.path());

    assert!(store.write(&sample_leaves()).await);
    assert!(store.write(&[]).await);

    assert!(store.read().await.is_empty());
}

#[tokio::test]
async fn file_store_document_is_pretty_printed_array() {
    let dir = tempfile::tempdir().unwrap();
    let store = LeafStore::file(dir.path());

    assert!(store.write(&sample_leaves()).await);

    let raw = std::fs::read_to_string(store.data_path().unwrap()).unwrap();
    assert!(raw.starts_with('['));
    assert!(raw.contains('\n'));
}

#[tokio::test]
async fn memory_store_round_trips_collection() {
    let store = LeafStore::memory();

    let leaves = sample_leaves();
    assert!(store.write(&leaves).await);
    assert_eq!(store.read().await, leaves);

    assert!(store.write(&[]).await);
    assert!(store.read().await.is_empty());
}

#[tokio::test]
async fn memory_store_starts_empty_and_has_no_path() {
    let store = LeafStore::memory();
    assert!(store.read().await.is_empty());
    assert!(store.data_path().is_none());
    assert_eq!(store.mode(), StorageMode::Memory);
}

#[tokio::test]
async fn readiness_probe_creates_data_directory() {
    let dir = tempfile::tempdir().unwrap();
    let nested = dir.path().join("data");
    let store = LeafStore::file(&nested);

    assert!(store.is_ready().await);
    assert!(nested.is_dir());
}

#[tokio::test]
async fn memory_store_is_always_ready() {
    assert!(LeafStore::memory().is_ready().await);
}

#[tokio::test]
async fn new_dispatches_on_mode() {
    let dir = tempfile::tempdir().unwrap();
    let file_store = LeafStore::new(StorageMode::File, dir.path());
    assert_eq!(file_store.mode(), StorageMode::File);

    let memory_store = LeafStore::new(StorageMode::Memory, dir.path());
    assert_eq!(memory_store.mode(), StorageMode::Memory);
}

#[test]
fn storage_mode_parses_known_names() {
    assert_eq!("file".parse::<StorageMode>().unwrap(), StorageMode::File);
    assert_eq!("MEMORY".parse::<StorageMode>().unwrap(), StorageMode::Memory);
    assert_eq!(
        "ephemeral".parse::<StorageMode>().unwrap(),
        StorageMode::Memory
    );
    assert!("postgres".parse::<StorageMode>().is_err());
}

#[tokio::test]
async fn update_guard_serializes_writers() {
    let store = std::sync::Arc::new(LeafStore::memory());

    // Two tasks both append one leaf under the update lock; with the lock
    // held across read-modify-write, neither append can be lost.
    let mut handles = Vec::new();
    for index in 0..2_u32 {
        let store = std::sync::Arc::clone(&store);
        handles.push(tokio::spawn(async move {
            let _guard = store.begin_update().await;
            let mut leaves = store.read().await;
            leaves.push(LeafRecord::new(index, None, None));
            assert!(store.write(&leaves).await);
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    assert_eq!(store.read().await.len(), 2);
}
