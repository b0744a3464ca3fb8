//! # Framing Errors

use thiserror::Error;

/// Result type for framing operations
pub type FramingResult<T> = Result<T, FramingError>;

/// Framing errors
#[derive(Debug, Error)]
pub enum FramingError {
    // Decode side
    #[error("gzip decompression failed: {0}")]
    Decompress(#[source] std::io::Error),

    #[error("invalid JSON payload: {0}")]
    Parse(#[source] serde_json::Error),

    // Encode side
    #[error("response serialization failed: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error("gzip compression failed: {0}")]
    Compress(#[source] std::io::Error),
}

impl FramingError {
    /// True for failures reading the inbound body
    pub fn is_decode(&self) -> bool {
        matches!(self, FramingError::Decompress(_) | FramingError::Parse(_))
    }

    /// Get HTTP status code
    pub fn status_code(&self) -> u16 {
        500
    }
}
