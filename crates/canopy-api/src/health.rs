//! Health, readiness, and liveness handlers.
//!
//! Liveness never fails. Readiness delegates to the store's writability
//! probe. The aggregate health endpoint reports process metadata plus the
//! current leaf count, degrading to a `503` status when storage is
//! unhealthy rather than failing outright.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET` | `/api/health` | Aggregate status + process metadata |
//! | `GET` | `/api/health/ready` | Storage writability |
//! | `GET` | `/api/health/live` | Process liveness |

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use chrono::Utc;
use serde_json::json;

use crate::state::AppState;

// ---------------------------------------------------------------------------
// GET /api/health/live -- liveness
// ---------------------------------------------------------------------------

/// Report that the process is running. Always `200`.
pub async fn live(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    Json(json!({
        "success": true,
        "status": "alive",
        "uptimeSeconds": state.uptime_seconds(),
        "timestamp": Utc::now().to_rfc3339(),
    }))
}

// ---------------------------------------------------------------------------
// GET /api/health/ready -- readiness
// ---------------------------------------------------------------------------

/// Report whether persistent storage is currently writable.
///
/// `200` when ready, `503` when the store's probe fails.
pub async fn ready(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let ready = state.store.is_ready().await;
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status,
        Json(json!({
            "success": ready,
            "status": if ready { "ready" } else { "not_ready" },
            "storage": {
                "mode": state.store.mode().as_str(),
                "writable": ready,
            },
            "timestamp": Utc::now().to_rfc3339(),
        })),
    )
}

// ---------------------------------------------------------------------------
// GET /api/health -- aggregate health
// ---------------------------------------------------------------------------

/// Report aggregate status, uptime, environment, storage mode, and the
/// current leaf count.
pub async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let writable = state.store.is_ready().await;
    let leaf_count = state.store.read().await.len();

    let status = if writable {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status,
        Json(json!({
            "success": writable,
            "status": if writable { "ok" } else { "degraded" },
            "environment": state.environment.as_str(),
            "uptimeSeconds": state.uptime_seconds(),
            "storageMode": state.store.mode().as_str(),
            "leafCount": leaf_count,
            "timestamp": Utc::now().to_rfc3339(),
        })),
    )
}
