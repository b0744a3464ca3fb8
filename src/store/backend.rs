//! # Store Backend Trait

use std::collections::HashSet;

use crate::document::RawDocument;

use super::errors::{StoreError, StoreOp, StoreResult};

/// Backend trait for the document store
pub trait DocumentStore: Send + Sync + std::fmt::Debug {
    /// Fetch a document
    fn get(&self, bucket: &str, key: &str) -> StoreResult<RawDocument>;

    /// Insert or overwrite a document
    fn put(&self, bucket: &str, key: &str, document: &RawDocument) -> StoreResult<()>;

    /// Remove a document
    fn delete(&self, bucket: &str, key: &str) -> StoreResult<()>;

    /// Check whether a key is present
    fn exists(&self, bucket: &str, key: &str) -> StoreResult<bool>;
}

/// Optional bucket allow-list shared by the backends.
///
/// An empty list admits every bucket.
#[derive(Debug, Clone, Default)]
pub struct BucketFilter {
    allowed: HashSet<String>,
}

impl BucketFilter {
    pub fn new<I, S>(buckets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            allowed: buckets.into_iter().map(Into::into).collect(),
        }
    }

    /// Reject buckets outside the allow-list
    pub fn check(&self, op: StoreOp, bucket: &str, key: &str) -> StoreResult<()> {
        if self.allowed.is_empty() || self.allowed.contains(bucket) {
            Ok(())
        } else {
            Err(StoreError::unknown_bucket(op, bucket, key))
        }
    }
}
