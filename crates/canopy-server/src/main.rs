//! Canopy server binary.
//!
//! Entry point that wires together the configuration, the record store,
//! and the HTTP surface. The storage mode (file-backed or ephemeral) is a
//! one-time decision at startup; the constructed store is injected into
//! the shared application state and owned by it for the process lifetime.
//!
//! # Startup Sequence
//!
//! 1. Load configuration (optional `canopy-config.yaml` + env overrides)
//! 2. Initialize structured logging (tracing)
//! 3. Construct the record store for the configured mode
//! 4. Probe storage writability (non-fatal; readiness keeps reporting it)
//! 5. Build the shared application state
//! 6. Serve HTTP until the process is terminated

mod config;
mod error;

use std::path::Path;
use std::sync::Arc;

use canopy_api::{AppState, RouterOptions, ServerConfig, start_server};
use canopy_store::LeafStore;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::config::AppConfig;
use crate::error::BootError;

/// Default path of the optional YAML configuration file.
const CONFIG_PATH: &str = "canopy-config.yaml";

#[tokio::main]
async fn main() -> Result<(), BootError> {
    // 1. Load configuration. CANOPY_CONFIG points at an alternate file.
    let config_path =
        std::env::var("CANOPY_CONFIG").unwrap_or_else(|_| String::from(CONFIG_PATH));
    let config = AppConfig::load(Path::new(&config_path))?;

    // 2. Initialize structured logging. RUST_LOG wins over the configured
    //    level.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.effective_log_level())),
        )
        .with_target(true)
        .init();

    info!(
        environment = %config.environment,
        storage_mode = %config.storage.mode,
        host = config.server.host,
        port = config.server.port,
        "configuration loaded"
    );

    // 3. Construct the record store for the configured mode.
    let store = LeafStore::new(config.storage.mode, &config.storage.data_dir);
    if let Some(path) = store.data_path() {
        info!(path = %path.display(), "file-backed store");
    } else {
        info!("ephemeral store; leaves are lost on restart");
    }

    // 4. Probe storage before serving.
    if store.is_ready().await {
        info!("storage ready");
    } else {
        warn!("storage probe failed; /api/health/ready will report not ready");
    }

    // 5. Shared application state.
    let state = Arc::new(AppState::new(store, config.environment));

    // 6. Serve until terminated.
    let server = ServerConfig {
        host: config.server.host.clone(),
        port: config.server.port,
    };
    let options = RouterOptions {
        static_dir: config.server.static_dir.clone(),
        allowed_origins: config.http.allowed_origins.clone(),
        body_limit_bytes: config.http.body_limit_bytes,
    };
    start_server(&server, state, &options).await?;

    Ok(())
}
