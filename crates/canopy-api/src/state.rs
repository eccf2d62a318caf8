//! Shared application state for the Canopy HTTP surface.
//!
//! [`AppState`] owns the injected [`LeafStore`] plus the metadata the
//! health endpoints report. It is wrapped in an [`Arc`](std::sync::Arc)
//! and handed to handlers through Axum's `State` extractor.

use std::time::Instant;

use canopy_store::LeafStore;
use serde::Deserialize;

// ---------------------------------------------------------------------------
// Environment
// ---------------------------------------------------------------------------

/// Deployment environment name.
///
/// Affects the CORS allow-list (development allows any origin) and the
/// default logging verbosity picked by the binary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Local development: permissive CORS, verbose logging default.
    #[default]
    Development,
    /// Production deployment: CORS restricted to the configured allow-list.
    Production,
}

impl Environment {
    /// Stable lowercase name used in logs and health payloads.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Development => "development",
            Self::Production => "production",
        }
    }

    /// Whether this is a production deployment.
    #[must_use]
    pub const fn is_production(self) -> bool {
        matches!(self, Self::Production)
    }

    /// Parse an environment name from a configuration or env-var string.
    ///
    /// Accepts `development`/`dev` and `production`/`prod`,
    /// case-insensitively. Returns `None` for anything else.
    #[must_use]
    pub fn from_env_value(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "development" | "dev" => Some(Self::Development),
            "production" | "prod" => Some(Self::Production),
            _ => None,
        }
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// AppState
// ---------------------------------------------------------------------------

/// Shared state for the Axum application.
///
/// Constructed once by the hosting binary and injected via `State`; the
/// store instance it owns is the only mutable state in the process.
#[derive(Debug)]
pub struct AppState {
    /// The record store backing the leaf collection.
    pub store: LeafStore,
    /// The deployment environment the process was started in.
    pub environment: Environment,
    /// Process start instant, for uptime reporting.
    started_at: Instant,
}

impl AppState {
    /// Create the application state around an injected store.
    #[must_use]
    pub fn new(store: LeafStore, environment: Environment) -> Self {
        Self {
            store,
            environment,
            started_at: Instant::now(),
        }
    }

    /// Whole seconds elapsed since the state was constructed.
    #[must_use]
    pub fn uptime_seconds(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }
}
