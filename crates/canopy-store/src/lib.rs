//! Record store for the Canopy leaf collection.
//!
//! The store persists the ordered sequence of [`canopy_types::LeafRecord`]
//! entries either as a pretty-printed JSON document on disk (file-backed
//! mode) or in memory for the lifetime of the process (ephemeral mode).
//! The mode is a process-wide decision made once at startup and never
//! changes afterwards.
//!
//! # Contract
//!
//! Reads never fail: an absent document is an empty collection, and an
//! unreadable or unparseable document degrades to an empty collection with
//! a logged warning. Writes replace the whole collection and report success
//! as a flag rather than an error; failures are logged internally.
//!
//! # Modules
//!
//! - [`store`] -- the [`LeafStore`] and its backends
//! - [`error`] -- internal error types for the I/O helpers

pub mod error;
pub mod store;

// Re-export primary types for convenience.
pub use error::StoreError;
pub use store::{LeafStore, StorageMode};
