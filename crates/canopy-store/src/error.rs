//! Error types for the record store.
//!
//! [`StoreError`] is internal to the store's I/O helpers: the public
//! `read`/`write` surface converts these into the degrade-and-log behavior
//! the store contract promises, so callers never see them directly.

/// Errors that can occur while reading or writing the persisted document.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A filesystem operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The document could not be serialized or deserialized.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
