//! Error types for the Canopy HTTP surface.
//!
//! [`ApiError`] unifies handler failure modes into a single enum that
//! converts into an HTTP response via its
//! [`IntoResponse`](axum::response::IntoResponse) implementation. Every
//! error body carries the same envelope as successful responses:
//! `success: false`, a message, and the numeric status.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Errors that can occur while handling an API request.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The store rejected a write; the collection was not durably updated.
    #[error("storage error: {0}")]
    Storage(String),

    /// A serialization error while shaping a response.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// An unexpected internal failure.
    #[error("internal error: {0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            Self::Storage(msg) | Self::Internal(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, msg.clone())
            }
            Self::Serialization(e) => {
                (StatusCode::INTERNAL_SERVER_ERROR, format!("JSON error: {e}"))
            }
        };

        let body = serde_json::json!({
            "success": false,
            "error": message,
            "status": status.as_u16(),
        });

        (status, axum::Json(body)).into_response()
    }
}
