//! Error types for the Canopy server binary.

use crate::config::ConfigError;

/// Errors that can abort server startup.
#[derive(Debug, thiserror::Error)]
pub enum BootError {
    /// Configuration could not be loaded.
    #[error("configuration error: {source}")]
    Config {
        /// The underlying configuration error.
        #[from]
        source: ConfigError,
    },

    /// The HTTP server failed to bind or serve.
    #[error("server error: {source}")]
    Server {
        /// The underlying server error.
        #[from]
        source: canopy_api::ServerError,
    },
}
