//! HTTP surface for the Canopy leaf wall.
//!
//! This crate provides the Axum application that fronts the record store:
//!
//! - **Leaf resource endpoints** (`/api/leaves`, `/api/leaves/stats`) for
//!   listing, creating, clearing, and summarizing the leaf collection
//! - **Health endpoints** (`/api/health`, `/api/health/ready`,
//!   `/api/health/live`) reporting liveness, storage readiness, and
//!   process metadata
//! - **Static pages** (`GET /`, `GET /thank-you`) served from the
//!   configured assets directory via `tower-http`
//!
//! # Architecture
//!
//! Handlers hold no state of their own: everything flows through the
//! shared [`AppState`], which owns the injected
//! [`LeafStore`](canopy_store::LeafStore). Create and clear operations
//! take the store's update lock so read-modify-write sequences cannot
//! interleave. Every JSON response carries a `success` flag; failures are
//! shaped by [`ApiError`]'s `IntoResponse` implementation.

pub mod error;
pub mod handlers;
pub mod health;
pub mod router;
pub mod server;
pub mod state;

// Re-export primary types for convenience.
pub use error::ApiError;
pub use router::{RouterOptions, build_router};
pub use server::{ServerConfig, ServerError, start_server};
pub use state::{AppState, Environment};
