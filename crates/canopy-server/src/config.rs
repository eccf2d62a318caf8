//! Configuration loading and typed config structures for the Canopy server.
//!
//! The canonical configuration lives in `canopy-config.yaml` at the
//! project root; the file is optional and every field has a default, so a
//! bare deployment can run on environment variables alone. Environment
//! overrides are applied after the file parse.

use std::path::{Path, PathBuf};

use canopy_api::Environment;
use canopy_store::StorageMode;
use serde::Deserialize;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level server configuration.
///
/// Mirrors the structure of `canopy-config.yaml`. All fields have
/// defaults, so an empty document (or no document at all) is valid.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct AppConfig {
    /// Deployment environment (`development` or `production`).
    #[serde(default)]
    pub environment: Environment,

    /// Network and static-asset settings.
    #[serde(default)]
    pub server: ServerSection,

    /// Persistence settings.
    #[serde(default)]
    pub storage: StorageSection,

    /// Cross-cutting HTTP settings.
    #[serde(default)]
    pub http: HttpSection,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingSection,
}

impl AppConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`] if the content is not valid YAML.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let mut config = Self::parse(&contents)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Parse configuration from a YAML string. No environment overrides
    /// are applied; [`from_file`](Self::from_file) and
    /// [`load`](Self::load) layer those on top.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_yml::from_str(yaml)?)
    }

    /// Load configuration from `path`, falling back to pure defaults
    /// (plus environment overrides) when the file does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error only for an unreadable or unparseable file; an
    /// absent file is not an error.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::from_file(path)
        } else {
            let mut config = Self::default();
            config.apply_env_overrides();
            Ok(config)
        }
    }

    /// Override configuration values from environment variables when set.
    ///
    /// Recognized variables: `CANOPY_ENV`, `HOST`, `PORT`,
    /// `CANOPY_STORAGE_MODE`, `CANOPY_DATA_DIR`, `CANOPY_STATIC_DIR`.
    /// Unparseable values are ignored, leaving the configured value in
    /// place.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("CANOPY_ENV")
            && let Some(environment) = Environment::from_env_value(&val)
        {
            self.environment = environment;
        }
        if let Ok(val) = std::env::var("HOST") {
            self.server.host = val;
        }
        if let Ok(val) = std::env::var("PORT")
            && let Ok(port) = val.parse()
        {
            self.server.port = port;
        }
        if let Ok(val) = std::env::var("CANOPY_STORAGE_MODE")
            && let Ok(mode) = val.parse()
        {
            self.storage.mode = mode;
        }
        if let Ok(val) = std::env::var("CANOPY_DATA_DIR") {
            self.storage.data_dir = PathBuf::from(val);
        }
        if let Ok(val) = std::env::var("CANOPY_STATIC_DIR") {
            self.server.static_dir = PathBuf::from(val);
        }
    }

    /// The log filter directive to use when `RUST_LOG` is not set.
    ///
    /// An explicit `logging.level` wins; otherwise development defaults
    /// to `debug` and production to `info`.
    #[must_use]
    pub fn effective_log_level(&self) -> &str {
        self.logging.level.as_deref().unwrap_or(match self.environment {
            Environment::Development => "debug",
            Environment::Production => "info",
        })
    }
}

/// Network and static-asset settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ServerSection {
    /// The host address to bind to.
    #[serde(default = "default_host")]
    pub host: String,

    /// The TCP port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Directory holding the static pages.
    #[serde(default = "default_static_dir")]
    pub static_dir: PathBuf,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            static_dir: default_static_dir(),
        }
    }
}

/// Persistence settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StorageSection {
    /// Persistence strategy (`file` or `memory`).
    #[serde(default)]
    pub mode: StorageMode,

    /// Directory holding the persisted document in file-backed mode.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

impl Default for StorageSection {
    fn default() -> Self {
        Self {
            mode: StorageMode::default(),
            data_dir: default_data_dir(),
        }
    }
}

/// Cross-cutting HTTP settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HttpSection {
    /// Origins allowed by CORS in production deployments.
    #[serde(default)]
    pub allowed_origins: Vec<String>,

    /// Maximum accepted request body size in bytes.
    #[serde(default = "default_body_limit_bytes")]
    pub body_limit_bytes: usize,
}

impl Default for HttpSection {
    fn default() -> Self {
        Self {
            allowed_origins: Vec::new(),
            body_limit_bytes: default_body_limit_bytes(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct LoggingSection {
    /// Log filter directive (trace, debug, info, warn, error). When
    /// unset, the environment picks the default.
    #[serde(default)]
    pub level: Option<String>,
}

fn default_host() -> String {
    String::from("0.0.0.0")
}

const fn default_port() -> u16 {
    3000
}

fn default_static_dir() -> PathBuf {
    PathBuf::from("public")
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

const fn default_body_limit_bytes() -> usize {
    64 * 1024
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_yields_defaults() {
        let config = AppConfig::parse("{}").unwrap();
        assert_eq!(config.environment, Environment::Development);
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.storage.mode, StorageMode::File);
        assert_eq!(config.storage.data_dir, PathBuf::from("data"));
    }

    #[test]
    fn yaml_values_override_defaults() {
        let yaml = r"
environment: production
server:
  port: 8080
  host: 127.0.0.1
storage:
  mode: memory
http:
  allowed_origins:
    - https://canopy.example
";
        let config = AppConfig::parse(yaml).unwrap();
        assert_eq!(config.environment, Environment::Production);
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.storage.mode, StorageMode::Memory);
        assert_eq!(
            config.http.allowed_origins,
            vec![String::from("https://canopy.example")]
        );
    }

    #[test]
    fn effective_log_level_tracks_environment() {
        let development = AppConfig::parse("environment: development").unwrap();
        assert_eq!(development.effective_log_level(), "debug");

        let production = AppConfig::parse("environment: production").unwrap();
        assert_eq!(production.effective_log_level(), "info");

        let explicit = AppConfig::parse("logging:\n  level: warn").unwrap();
        assert_eq!(explicit.effective_log_level(), "warn");
    }

    #[test]
    fn load_with_missing_file_falls_back_to_defaults() {
        let config = AppConfig::load(Path::new("definitely-missing.yaml")).unwrap();
        assert_eq!(config.server.port, 3000);
    }

    #[test]
    fn invalid_yaml_is_an_error() {
        assert!(AppConfig::parse("server: [not, a, map").is_err());
    }
}
