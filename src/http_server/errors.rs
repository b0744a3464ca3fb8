//! # HTTP Server Errors

use thiserror::Error;

/// Result type for server startup and serving
pub type ServerResult<T> = Result<T, ServerError>;

/// Listener errors
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Invalid listen address '{0}'")]
    InvalidAddress(String),

    #[error("Failed to load TLS certificate/key: {0}")]
    Tls(#[source] std::io::Error),

    #[error("HTTP server failed: {0}")]
    Io(#[from] std::io::Error),
}
