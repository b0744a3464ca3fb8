//! # In-Memory Backend

use std::collections::HashMap;
use std::sync::RwLock;

use crate::document::RawDocument;

use super::backend::{BucketFilter, DocumentStore};
use super::errors::{StoreError, StoreOp, StoreResult};

/// In-memory document store
#[derive(Debug, Default)]
pub struct MemoryStore {
    filter: BucketFilter,
    buckets: RwLock<HashMap<String, HashMap<String, RawDocument>>>,
}

impl MemoryStore {
    /// Create a store that accepts any bucket
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store restricted to the given buckets
    pub fn with_buckets(filter: BucketFilter) -> Self {
        Self {
            filter,
            buckets: RwLock::new(HashMap::new()),
        }
    }

    /// Number of documents in a bucket
    pub fn len(&self, bucket: &str) -> usize {
        self.buckets
            .read()
            .map(|b| b.get(bucket).map(HashMap::len).unwrap_or(0))
            .unwrap_or(0)
    }
}

impl DocumentStore for MemoryStore {
    fn get(&self, bucket: &str, key: &str) -> StoreResult<RawDocument> {
        self.filter.check(StoreOp::Get, bucket, key)?;
        let buckets = self
            .buckets
            .read()
            .map_err(|_| StoreError::internal(StoreOp::Get, bucket, key, "Lock poisoned"))?;

        buckets
            .get(bucket)
            .and_then(|docs| docs.get(key))
            .cloned()
            .ok_or_else(|| StoreError::not_found(bucket, key))
    }

    fn put(&self, bucket: &str, key: &str, document: &RawDocument) -> StoreResult<()> {
        self.filter.check(StoreOp::Put, bucket, key)?;
        let mut buckets = self
            .buckets
            .write()
            .map_err(|_| StoreError::internal(StoreOp::Put, bucket, key, "Lock poisoned"))?;

        buckets
            .entry(bucket.to_string())
            .or_default()
            .insert(key.to_string(), document.clone());
        Ok(())
    }

    fn delete(&self, bucket: &str, key: &str) -> StoreResult<()> {
        self.filter.check(StoreOp::Delete, bucket, key)?;
        let mut buckets = self
            .buckets
            .write()
            .map_err(|_| StoreError::internal(StoreOp::Delete, bucket, key, "Lock poisoned"))?;

        buckets
            .get_mut(bucket)
            .and_then(|docs| docs.remove(key))
            .map(|_| ())
            .ok_or_else(|| StoreError::not_found(bucket, key))
    }

    fn exists(&self, bucket: &str, key: &str) -> StoreResult<bool> {
        self.filter.check(StoreOp::Exists, bucket, key)?;
        let buckets = self
            .buckets
            .read()
            .map_err(|_| StoreError::internal(StoreOp::Exists, bucket, key, "Lock poisoned"))?;

        Ok(buckets
            .get(bucket)
            .map(|docs| docs.contains_key(key))
            .unwrap_or(false))
    }
}
