//! # Receiver Configuration
//!
//! Loaded once at startup from a JSON file:
//!
//! ```json
//! {
//!   "http_server": {
//!     "port": 8443,
//!     "tls": { "cert_file": "/etc/receiver/server.crt", "key_file": "/etc/receiver/server.key" },
//!     "authorization": { "username": "sender", "password": "secret" }
//!   },
//!   "endpoints": { "upsert": "/upsert" },
//!   "store": { "kind": "local", "root": "/var/lib/receiver", "null_document_bucket": "null_docs" },
//!   "watchdog": { "schedule": "*/5 * * * *" },
//!   "logging": { "level": "info", "format": "json" }
//! }
//! ```

mod errors;

pub use errors::{ConfigError, ConfigResult};

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::http_server::{EndpointConfig, HttpServerConfig};
use crate::watchdog::CheckSchedule;

/// Top-level configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReceiverConfig {
    #[serde(default)]
    pub http_server: HttpServerConfig,

    #[serde(default)]
    pub endpoints: EndpointConfig,

    #[serde(default)]
    pub store: StoreConfig,

    #[serde(default)]
    pub watchdog: WatchdogConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Which backend holds the documents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreKind {
    #[default]
    Memory,
    Local,
}

/// Store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default)]
    pub kind: StoreKind,

    /// Root directory for the local backend
    #[serde(default)]
    pub root: Option<PathBuf>,

    /// Allowed buckets (empty = any)
    #[serde(default)]
    pub buckets: Vec<String>,

    /// Quarantine bucket for emptied documents
    #[serde(default = "default_null_document_bucket")]
    pub null_document_bucket: String,

    /// Bucket holding the sender's configuration document
    #[serde(default = "default_config_bucket")]
    pub config_bucket: String,

    /// Key of the sender's configuration document
    #[serde(default = "default_config_document_key")]
    pub config_document_key: String,
}

fn default_null_document_bucket() -> String {
    "null_documents".to_string()
}

fn default_config_bucket() -> String {
    "replication_config".to_string()
}

fn default_config_document_key() -> String {
    "cb_to_cb_config".to_string()
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            kind: StoreKind::Memory,
            root: None,
            buckets: Vec::new(),
            null_document_bucket: default_null_document_bucket(),
            config_bucket: default_config_bucket(),
            config_document_key: default_config_document_key(),
        }
    }
}

/// Certificate watchdog configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatchdogConfig {
    /// Cron expression, UTC
    #[serde(default = "default_schedule")]
    pub schedule: String,
}

fn default_schedule() -> String {
    "*/5 * * * *".to_string()
}

impl Default for WatchdogConfig {
    fn default() -> Self {
        Self {
            schedule: default_schedule(),
        }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Json,
    Pretty,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter when RUST_LOG is unset
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default)]
    pub format: LogFormat,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::Json,
        }
    }
}

impl ReceiverConfig {
    /// Load configuration from file
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| ConfigError::Read(format!("{}: {}", path.display(), e)))?;

        let config = Self::from_json(&content)?;
        config.validate()?;

        Ok(config)
    }

    /// Parse configuration without validating it
    pub fn from_json(content: &str) -> ConfigResult<Self> {
        serde_json::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Check cross-field constraints
    pub fn validate(&self) -> ConfigResult<()> {
        if self.http_server.port == 0 {
            return Err(ConfigError::invalid("http_server.port must be > 0"));
        }

        let auth = &self.http_server.authorization;
        if auth.username.is_empty() || auth.password.is_empty() {
            return Err(ConfigError::invalid(
                "http_server.authorization requires a username and password",
            ));
        }

        let mut seen = HashSet::new();
        for (name, path) in self.endpoints.paths() {
            if !path.starts_with('/') {
                return Err(ConfigError::invalid(format!(
                    "endpoints.{} must start with '/': '{}'",
                    name, path
                )));
            }
            if !seen.insert(path) {
                return Err(ConfigError::invalid(format!(
                    "endpoints.{} duplicates another endpoint: '{}'",
                    name, path
                )));
            }
        }

        let store = &self.store;
        if store.null_document_bucket.is_empty() {
            return Err(ConfigError::invalid("store.null_document_bucket must not be empty"));
        }
        if store.null_document_bucket == store.config_bucket {
            return Err(ConfigError::invalid(
                "store.null_document_bucket must differ from store.config_bucket",
            ));
        }
        if !store.buckets.is_empty() {
            for required in [&store.null_document_bucket, &store.config_bucket] {
                if !store.buckets.contains(required) {
                    return Err(ConfigError::invalid(format!(
                        "store.buckets must include '{}'",
                        required
                    )));
                }
            }
        }
        if store.kind == StoreKind::Local && store.root.is_none() {
            return Err(ConfigError::invalid("store.root is required when store.kind is 'local'"));
        }

        CheckSchedule::parse(&self.watchdog.schedule)
            .map_err(|e| ConfigError::invalid(format!("watchdog.schedule: {}", e)))?;

        Ok(())
    }
}
