//! HTTP Server Configuration
//!
//! Listener address, TLS material, the basic-auth credential pair, and the
//! endpoint paths the sender posts to.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpServerConfig {
    /// Host to bind to (default: "0.0.0.0")
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind to (default: 8443)
    #[serde(default = "default_port")]
    pub port: u16,

    /// TLS certificate and key; plain HTTP when absent
    #[serde(default)]
    pub tls: Option<TlsConfig>,

    /// Basic-auth credential pair
    #[serde(default)]
    pub authorization: BasicAuthConfig,
}

/// PEM certificate and key paths
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TlsConfig {
    pub cert_file: PathBuf,
    pub key_file: PathBuf,
}

/// Single username/password pair
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct BasicAuthConfig {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

impl std::fmt::Debug for BasicAuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BasicAuthConfig")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8443
}

impl Default for HttpServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            tls: None,
            authorization: BasicAuthConfig::default(),
        }
    }
}

impl HttpServerConfig {
    /// Create a new config with specified port
    pub fn with_port(port: u16) -> Self {
        Self {
            port,
            ..Default::default()
        }
    }

    /// Get the socket address string
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Endpoint paths
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EndpointConfig {
    pub upsert: String,
    pub remove: String,
    pub exists: String,
    pub get: String,
    pub null_data: String,
    pub config_document: String,
    pub healthcheck: String,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            upsert: "/upsert".to_string(),
            remove: "/remove".to_string(),
            exists: "/exists".to_string(),
            get: "/get".to_string(),
            null_data: "/nullData".to_string(),
            config_document: "/cbToCbConfig".to_string(),
            healthcheck: "/health".to_string(),
        }
    }
}

impl EndpointConfig {
    /// All paths with their config names
    pub fn paths(&self) -> [(&'static str, &str); 7] {
        [
            ("upsert", &self.upsert),
            ("remove", &self.remove),
            ("exists", &self.exists),
            ("get", &self.get),
            ("null_data", &self.null_data),
            ("config_document", &self.config_document),
            ("healthcheck", &self.healthcheck),
        ]
    }
}
