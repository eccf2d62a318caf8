//! REST handlers for the leaf collection resource.
//!
//! Each operation is a single read-modify-write transaction against the
//! injected [`LeafStore`](canopy_store::LeafStore); mutating operations
//! hold the store's update lock for the whole sequence. Responses are
//! JSON envelopes carrying a `success` flag.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET` | `/api/leaves` | List the collection |
//! | `POST` | `/api/leaves` | Add a leaf (or echo an existing one) |
//! | `DELETE` | `/api/leaves` | Clear the collection |
//! | `GET` | `/api/leaves/stats` | Collection statistics |

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use canopy_types::{LeafPosition, LeafRecord};
use chrono::Utc;
use serde_json::json;
use tracing::info;

use crate::error::ApiError;
use crate::state::AppState;

/// Request body for `POST /api/leaves`. Every field is optional.
#[derive(Debug, serde::Deserialize)]
pub struct CreateLeafRequest {
    /// Explicit index for the new leaf. Auto-assigned when omitted.
    pub index: Option<u32>,
    /// Display position override. Derived from the index when omitted.
    pub position: Option<LeafPosition>,
    /// Free-form source tag. Defaults to `"manual"`.
    pub source: Option<String>,
}

// ---------------------------------------------------------------------------
// GET /api/leaves -- list the collection
// ---------------------------------------------------------------------------

/// Return the full collection, its count, and a timestamp.
pub async fn list_leaves(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    let leaves = state.store.read().await;
    let count = leaves.len();

    Json(json!({
        "success": true,
        "leaves": leaves,
        "count": count,
        "timestamp": Utc::now().to_rfc3339(),
    }))
}

// ---------------------------------------------------------------------------
// POST /api/leaves -- create a leaf
// ---------------------------------------------------------------------------

/// Add a leaf to the collection.
///
/// A supplied `index` that already exists is a no-op: the existing record
/// is echoed back with `200 OK`. Otherwise the new record is appended and
/// persisted, responding `201 Created`. When `index` is omitted, the
/// smallest non-negative integer not already in use is assigned.
pub async fn create_leaf(
    State(state): State<Arc<AppState>>,
    Json(body): Json<CreateLeafRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let _update = state.store.begin_update().await;
    let mut leaves = state.store.read().await;

    if let Some(requested) = body.index
        && let Some(existing) = leaves.iter().find(|leaf| leaf.index == requested)
    {
        return Ok((
            StatusCode::OK,
            Json(json!({
                "success": true,
                "leaf": existing,
                "totalLeaves": leaves.len(),
                "message": format!("Leaf {requested} already exists"),
            })),
        ));
    }

    let index = body.index.unwrap_or_else(|| next_free_index(&leaves));
    let leaf = LeafRecord::new(index, body.position, body.source);
    leaves.push(leaf.clone());

    if !state.store.write(&leaves).await {
        return Err(ApiError::Storage(String::from(
            "failed to persist the leaf collection",
        )));
    }

    info!(index, total = leaves.len(), "leaf added");
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "leaf": leaf,
            "totalLeaves": leaves.len(),
            "message": "Leaf added to the tree",
        })),
    ))
}

// ---------------------------------------------------------------------------
// DELETE /api/leaves -- clear the collection
// ---------------------------------------------------------------------------

/// Clear the collection by persisting an empty sequence.
pub async fn clear_leaves(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ApiError> {
    let _update = state.store.begin_update().await;

    if !state.store.write(&[]).await {
        return Err(ApiError::Storage(String::from(
            "failed to clear the leaf collection",
        )));
    }

    info!("leaf collection cleared");
    Ok(Json(json!({
        "success": true,
        "message": "All leaves cleared",
        "timestamp": Utc::now().to_rfc3339(),
    })))
}

// ---------------------------------------------------------------------------
// GET /api/leaves/stats -- collection statistics
// ---------------------------------------------------------------------------

/// Summarize the collection: total count, per-source counts, the five
/// most recent records, and the oldest/newest record by timestamp.
///
/// Equal timestamps keep insertion order: the recency sort is stable,
/// the oldest pick is the earliest-inserted minimum, and the newest pick
/// is the latest-inserted maximum.
pub async fn leaf_stats(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    let leaves = state.store.read().await;

    let mut sources: BTreeMap<&str, usize> = BTreeMap::new();
    for leaf in &leaves {
        let entry = sources.entry(leaf.source.as_str()).or_insert(0);
        *entry = entry.saturating_add(1);
    }

    let mut by_recency: Vec<&LeafRecord> = leaves.iter().collect();
    by_recency.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    let recent: Vec<&LeafRecord> = by_recency.into_iter().take(5).collect();

    let oldest = leaves.iter().min_by_key(|leaf| leaf.timestamp);
    let newest = leaves.iter().max_by_key(|leaf| leaf.timestamp);

    Json(json!({
        "success": true,
        "stats": {
            "totalLeaves": leaves.len(),
            "sources": sources,
            "recentLeaves": recent,
            "oldestLeaf": oldest,
            "newestLeaf": newest,
        },
        "timestamp": Utc::now().to_rfc3339(),
    }))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Smallest non-negative integer not present among the collection's
/// indices, scanning upward from zero.
fn next_free_index(leaves: &[LeafRecord]) -> u32 {
    let used: BTreeSet<u32> = leaves.iter().map(|leaf| leaf.index).collect();
    let mut candidate = 0_u32;
    while used.contains(&candidate) {
        candidate = candidate.saturating_add(1);
    }
    candidate
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(index: u32) -> LeafRecord {
        LeafRecord::new(index, None, None)
    }

    #[test]
    fn next_free_index_fills_gaps() {
        let leaves = vec![leaf(0), leaf(1), leaf(3)];
        assert_eq!(next_free_index(&leaves), 2);
    }

    #[test]
    fn next_free_index_starts_at_zero() {
        assert_eq!(next_free_index(&[]), 0);
        assert_eq!(next_free_index(&[leaf(1), leaf(2)]), 0);
    }

    #[test]
    fn next_free_index_appends_after_dense_prefix() {
        let leaves = vec![leaf(0), leaf(1), leaf(2)];
        assert_eq!(next_free_index(&leaves), 3);
    }
}
