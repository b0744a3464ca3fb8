//! # Store Errors

use std::fmt;

use thiserror::Error;

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Store operation, recorded on every error for log context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreOp {
    Get,
    Put,
    Delete,
    Exists,
}

impl fmt::Display for StoreOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let op = match self {
            StoreOp::Get => "get",
            StoreOp::Put => "put",
            StoreOp::Delete => "delete",
            StoreOp::Exists => "exists",
        };
        f.write_str(op)
    }
}

/// Store errors
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    #[error("document not found: {bucket}/{key}")]
    NotFound { bucket: String, key: String },

    #[error("{op} {bucket}/{key}: unknown bucket")]
    UnknownBucket {
        op: StoreOp,
        bucket: String,
        key: String,
    },

    #[error("{op} {bucket}/{key}: I/O error: {message}")]
    Io {
        op: StoreOp,
        bucket: String,
        key: String,
        message: String,
    },

    #[error("{op} {bucket}/{key}: corrupt document: {message}")]
    Corrupt {
        op: StoreOp,
        bucket: String,
        key: String,
        message: String,
    },

    #[error("{op} {bucket}/{key}: internal error: {message}")]
    Internal {
        op: StoreOp,
        bucket: String,
        key: String,
        message: String,
    },
}

impl StoreError {
    pub fn not_found(bucket: &str, key: &str) -> Self {
        StoreError::NotFound {
            bucket: bucket.to_string(),
            key: key.to_string(),
        }
    }

    pub fn unknown_bucket(op: StoreOp, bucket: &str, key: &str) -> Self {
        StoreError::UnknownBucket {
            op,
            bucket: bucket.to_string(),
            key: key.to_string(),
        }
    }

    pub fn io(op: StoreOp, bucket: &str, key: &str, err: impl fmt::Display) -> Self {
        StoreError::Io {
            op,
            bucket: bucket.to_string(),
            key: key.to_string(),
            message: err.to_string(),
        }
    }

    pub fn corrupt(op: StoreOp, bucket: &str, key: &str, err: impl fmt::Display) -> Self {
        StoreError::Corrupt {
            op,
            bucket: bucket.to_string(),
            key: key.to_string(),
            message: err.to_string(),
        }
    }

    pub fn internal(op: StoreOp, bucket: &str, key: &str, message: impl Into<String>) -> Self {
        StoreError::Internal {
            op,
            bucket: bucket.to_string(),
            key: key.to_string(),
            message: message.into(),
        }
    }

    /// The store's not-found sentinel
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. })
    }

    /// HTTP status for a failure reply.
    ///
    /// Handlers answer an expected absence with 200 themselves; a not-found
    /// that still reaches a failure reply is a required document going
    /// missing, so every variant maps to 500.
    pub fn status_code(&self) -> u16 {
        500
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_classification() {
        assert!(StoreError::not_found("b", "k").is_not_found());
        assert!(!StoreError::unknown_bucket(StoreOp::Get, "b", "k").is_not_found());
        assert!(!StoreError::io(StoreOp::Put, "b", "k", "disk full").is_not_found());
    }

    #[test]
    fn test_error_carries_context() {
        let err = StoreError::io(StoreOp::Delete, "orders", "o-1", "permission denied");
        let msg = err.to_string();
        assert!(msg.starts_with("delete orders/o-1"));
        assert!(msg.contains("permission denied"));
        assert_eq!(err.status_code(), 500);
    }

    #[test]
    fn test_not_found_is_never_404() {
        assert_eq!(StoreError::not_found("b", "k").status_code(), 500);
        assert_eq!(StoreError::unknown_bucket(StoreOp::Get, "b", "k").status_code(), 500);
    }
}
