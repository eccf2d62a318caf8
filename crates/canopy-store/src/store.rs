//! File-backed and ephemeral persistence for the leaf collection.
//!
//! [`LeafStore`] owns its state entirely: the ephemeral backend is a
//! `RwLock`-protected vector inside the store instance rather than ambient
//! process-global state, so the hosting binary constructs one store and
//! injects it into the request handlers.
//!
//! Read-modify-write sequences (create, clear) are serialized through the
//! per-store update mutex handed out by [`LeafStore::begin_update`]. The
//! mutex closes the lost-update race between concurrent creates without
//! changing the read/write contract.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use canopy_types::LeafRecord;
use serde::Deserialize;
use tokio::sync::{Mutex, MutexGuard, RwLock};
use tracing::{debug, error, warn};

use crate::error::StoreError;

/// Name of the JSON document holding the collection in file-backed mode.
const LEAVES_FILE: &str = "leaves.json";

/// Name of the scratch file the readiness probe writes and removes.
const PROBE_FILE: &str = ".writable";

// ---------------------------------------------------------------------------
// StorageMode
// ---------------------------------------------------------------------------

/// Persistence strategy for the leaf collection.
///
/// Selected once at startup from configuration or the environment; the
/// store never switches modes during the process lifetime.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageMode {
    /// Collection stored as a JSON document on disk, surviving restarts.
    #[default]
    File,
    /// Collection held in process memory only, lost on restart.
    Memory,
}

impl StorageMode {
    /// Stable lowercase name used in logs and health payloads.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::File => "file",
            Self::Memory => "memory",
        }
    }
}

impl std::fmt::Display for StorageMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a mode string is not recognized.
#[derive(Debug, thiserror::Error)]
#[error("unknown storage mode: {0}")]
pub struct UnknownModeError(String);

impl FromStr for StorageMode {
    type Err = UnknownModeError;

    /// Parse a mode from a configuration or environment string.
    ///
    /// Accepts `file` and `memory` (with `ephemeral` as an alias),
    /// case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "file" => Ok(Self::File),
            "memory" | "ephemeral" => Ok(Self::Memory),
            other => Err(UnknownModeError(String::from(other))),
        }
    }
}

// ---------------------------------------------------------------------------
// LeafStore
// ---------------------------------------------------------------------------

/// Backend state for the two persistence strategies.
#[derive(Debug)]
enum Backend {
    /// JSON document under `data_dir`.
    File {
        /// Directory holding the document; created on first write.
        data_dir: PathBuf,
    },
    /// Process-lifetime collection.
    Memory {
        /// The collection itself, replaced wholesale on every write.
        leaves: RwLock<Vec<LeafRecord>>,
    },
}

/// The record store for the leaf collection.
///
/// Cheap to share behind an `Arc`; all methods take `&self`.
#[derive(Debug)]
pub struct LeafStore {
    backend: Backend,
    /// Serializes read-modify-write sequences across the store.
    update_lock: Mutex<()>,
}

impl LeafStore {
    /// Create a file-backed store rooted at `data_dir`.
    ///
    /// The directory (and document) are created lazily on first write.
    #[must_use]
    pub fn file(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            backend: Backend::File {
                data_dir: data_dir.into(),
            },
            update_lock: Mutex::new(()),
        }
    }

    /// Create an ephemeral store with an empty collection.
    #[must_use]
    pub fn memory() -> Self {
        Self {
            backend: Backend::Memory {
                leaves: RwLock::new(Vec::new()),
            },
            update_lock: Mutex::new(()),
        }
    }

    /// Create a store for the given mode. `data_dir` is only consulted in
    /// file-backed mode.
    #[must_use]
    pub fn new(mode: StorageMode, data_dir: impl Into<PathBuf>) -> Self {
        match mode {
            StorageMode::File => Self::file(data_dir),
            StorageMode::Memory => Self::memory(),
        }
    }

    /// The persistence strategy this store was built with.
    #[must_use]
    pub const fn mode(&self) -> StorageMode {
        match self.backend {
            Backend::File { .. } => StorageMode::File,
            Backend::Memory { .. } => StorageMode::Memory,
        }
    }

    /// Path of the persisted document, when one exists.
    ///
    /// Returns `None` for ephemeral stores.
    #[must_use]
    pub fn data_path(&self) -> Option<PathBuf> {
        match &self.backend {
            Backend::File { data_dir } => Some(data_dir.join(LEAVES_FILE)),
            Backend::Memory { .. } => None,
        }
    }

    /// Acquire the store's update lock for a read-modify-write sequence.
    ///
    /// Hold the returned guard across the `read` / mutate / `write` steps
    /// of an operation; dropping it releases the lock.
    pub async fn begin_update(&self) -> MutexGuard<'_, ()> {
        self.update_lock.lock().await
    }

    /// Current collection.
    ///
    /// Never fails: an absent document reads as empty, and an unreadable
    /// or unparseable document degrades to empty with a logged warning.
    /// The corrupt document is left in place until the next successful
    /// write replaces it.
    pub async fn read(&self) -> Vec<LeafRecord> {
        match &self.backend {
            Backend::Memory { leaves } => leaves.read().await.clone(),
            Backend::File { data_dir } => {
                let path = data_dir.join(LEAVES_FILE);
                match try_read_document(&path).await {
                    Ok(leaves) => leaves,
                    Err(StoreError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                        Vec::new()
                    }
                    Err(e) => {
                        warn!(
                            path = %path.display(),
                            error = %e,
                            "leaf document unreadable, treating collection as empty"
                        );
                        Vec::new()
                    }
                }
            }
        }
    }

    /// Persist the full collection, replacing any prior state.
    ///
    /// Returns `false` on failure with the cause logged. File-backed mode
    /// overwrites the whole document in place with no atomic rename, so a
    /// failure mid-write can leave a corrupt document behind.
    pub async fn write(&self, leaves: &[LeafRecord]) -> bool {
        match &self.backend {
            Backend::Memory { leaves: held } => {
                *held.write().await = leaves.to_vec();
                true
            }
            Backend::File { data_dir } => match try_write_document(data_dir, leaves).await {
                Ok(()) => {
                    debug!(count = leaves.len(), "persisted leaf collection");
                    true
                }
                Err(e) => {
                    error!(
                        data_dir = %data_dir.display(),
                        error = %e,
                        "failed to persist leaf collection"
                    );
                    false
                }
            },
        }
    }

    /// Whether the store can currently be written to.
    ///
    /// File-backed mode ensures the data directory exists and verifies
    /// write access by touching and removing a probe file. Ephemeral mode
    /// is trivially ready.
    pub async fn is_ready(&self) -> bool {
        match &self.backend {
            Backend::Memory { .. } => true,
            Backend::File { data_dir } => {
                if let Err(e) = tokio::fs::create_dir_all(data_dir).await {
                    warn!(
                        data_dir = %data_dir.display(),
                        error = %e,
                        "data directory unavailable"
                    );
                    return false;
                }
                let probe = data_dir.join(PROBE_FILE);
                match tokio::fs::write(&probe, b"ok").await {
                    Ok(()) => {
                        let _ = tokio::fs::remove_file(&probe).await;
                        true
                    }
                    Err(e) => {
                        warn!(
                            data_dir = %data_dir.display(),
                            error = %e,
                            "data directory not writable"
                        );
                        false
                    }
                }
            }
        }
    }
}

/// Read and parse the persisted document at `path`.
async fn try_read_document(path: &Path) -> Result<Vec<LeafRecord>, StoreError> {
    let bytes = tokio::fs::read(path).await?;
    Ok(serde_json::from_slice(&bytes)?)
}

/// Serialize and overwrite the persisted document under `data_dir`.
///
/// Creates the data directory on first use. Whole-document overwrite with
/// no partial-write protection.
async fn try_write_document(data_dir: &Path, leaves: &[LeafRecord]) -> Result<(), StoreError> {
    tokio::fs::create_dir_all(data_dir).await?;
    let bytes = serde_json::to_vec_pretty(leaves)?;
    tokio::fs::write(data_dir.join(LEAVES_FILE), bytes).await?;
    Ok(())
}
