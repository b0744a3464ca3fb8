//! # Migration Errors

use thiserror::Error;
use uuid::Uuid;

use crate::store::StoreError;

/// Result type for migration operations
pub type MigrationResult<T> = Result<T, MigrationError>;

/// Migration errors
#[derive(Debug, Clone, Error)]
pub enum MigrationError {
    /// Fetch or quarantine insert failed; the source document is untouched
    #[error("migration failed: {0}")]
    Store(#[source] StoreError),

    /// Insert succeeded but the source delete failed
    #[error(
        "migration inconsistency: document {key} copied to {quarantine_bucket} but not removed \
         from {source_bucket} (relocation {relocation_id}): {cause}"
    )]
    Inconsistent {
        key: String,
        source_bucket: String,
        quarantine_bucket: String,
        relocation_id: Uuid,
        #[source]
        cause: StoreError,
    },

    /// Another request is already migrating this key
    #[error("migration already in progress for {bucket}/{key}")]
    InFlight { bucket: String, key: String },

    /// Source and quarantine are the same bucket
    #[error("bucket {0} is the quarantine bucket")]
    SourceIsQuarantine(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl MigrationError {
    /// True when the document was left in both buckets
    pub fn is_inconsistent(&self) -> bool {
        matches!(self, MigrationError::Inconsistent { .. })
    }

    /// Get HTTP status code
    pub fn status_code(&self) -> u16 {
        500
    }
}
