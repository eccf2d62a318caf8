//! Axum router construction for the Canopy HTTP surface.
//!
//! Assembles the leaf resource routes, health routes, and static page
//! services into a single [`Router`] with the cross-cutting middleware:
//! CORS (environment-dependent allow-list), gzip compression, a request
//! body cap, and request tracing.

use std::path::PathBuf;
use std::sync::Arc;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::http::HeaderValue;
use axum::routing::get;
use tower_http::compression::CompressionLayer;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::health;
use crate::state::{AppState, Environment};

/// Default cap on request body size. Leaf payloads are tiny; anything
/// bigger than this is not a legitimate request.
const DEFAULT_BODY_LIMIT_BYTES: usize = 64 * 1024;

/// Cross-cutting options applied while assembling the router.
#[derive(Debug, Clone)]
pub struct RouterOptions {
    /// Directory holding the static pages (`index.html`,
    /// `thank-you.html`, and any assets they reference).
    pub static_dir: PathBuf,
    /// Origins allowed by CORS in production. Ignored in development,
    /// where any origin is allowed.
    pub allowed_origins: Vec<String>,
    /// Maximum accepted request body size in bytes.
    pub body_limit_bytes: usize,
}

impl Default for RouterOptions {
    fn default() -> Self {
        Self {
            static_dir: PathBuf::from("public"),
            allowed_origins: Vec::new(),
            body_limit_bytes: DEFAULT_BODY_LIMIT_BYTES,
        }
    }
}

/// Build the complete Axum router for the Canopy server.
///
/// Routes:
/// - `GET|POST|DELETE /api/leaves` -- the leaf collection resource
/// - `GET /api/leaves/stats` -- collection statistics
/// - `GET /api/health`, `/api/health/ready`, `/api/health/live`
/// - `GET /thank-you` -- static page
/// - everything else falls back to the static directory, which serves
///   `index.html` for `GET /` and yields 404 for unknown paths
pub fn build_router(state: Arc<AppState>, options: &RouterOptions) -> Router {
    let cors = cors_layer(state.environment, &options.allowed_origins);

    let thank_you = ServeFile::new(options.static_dir.join("thank-you.html"));
    let pages = ServeDir::new(&options.static_dir);

    Router::new()
        // Leaf resource
        .route(
            "/api/leaves",
            get(handlers::list_leaves)
                .post(handlers::create_leaf)
                .delete(handlers::clear_leaves),
        )
        .route("/api/leaves/stats", get(handlers::leaf_stats))
        // Health surface
        .route("/api/health", get(health::health))
        .route("/api/health/ready", get(health::ready))
        .route("/api/health/live", get(health::live))
        // Static pages
        .route_service("/thank-you", thank_you)
        .fallback_service(pages)
        // Cross-cutting middleware
        .layer(DefaultBodyLimit::max(options.body_limit_bytes))
        .layer(CompressionLayer::new())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Build the CORS layer for the given environment.
///
/// Development allows any origin for local front-end work. Production
/// restricts origins to the configured allow-list; entries that are not
/// valid header values are skipped.
fn cors_layer(environment: Environment, allowed_origins: &[String]) -> CorsLayer {
    if environment.is_production() {
        let origins: Vec<HeaderValue> = allowed_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    }
}
