//! # Local Filesystem Backend
//!
//! One JSON file per document: `<root>/<bucket>/<base64url(key)>.json`.

use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use uuid::Uuid;

use crate::document::RawDocument;

use super::backend::{BucketFilter, DocumentStore};
use super::errors::{StoreError, StoreOp, StoreResult};

/// Filesystem-backed document store
#[derive(Debug)]
pub struct LocalStore {
    root: PathBuf,
    filter: BucketFilter,
}

impl LocalStore {
    /// Create a new local store rooted at `root`
    pub fn new(root: PathBuf) -> Self {
        Self {
            root,
            filter: BucketFilter::default(),
        }
    }

    /// Restrict the store to an allow-list of buckets
    pub fn with_filter(mut self, filter: BucketFilter) -> Self {
        self.filter = filter;
        self
    }

    fn bucket_dir(&self, bucket: &str) -> PathBuf {
        self.root.join(bucket)
    }

    // Keys may contain path separators, so the file name is encoded.
    fn document_path(&self, bucket: &str, key: &str) -> PathBuf {
        self.bucket_dir(bucket)
            .join(format!("{}.json", URL_SAFE_NO_PAD.encode(key.as_bytes())))
    }

    fn check_bucket_name(&self, op: StoreOp, bucket: &str, key: &str) -> StoreResult<()> {
        self.filter.check(op, bucket, key)?;
        if bucket.is_empty() || bucket == "." || bucket == ".." || bucket.contains(['/', '\\']) {
            return Err(StoreError::unknown_bucket(op, bucket, key));
        }
        Ok(())
    }
}

impl DocumentStore for LocalStore {
    fn get(&self, bucket: &str, key: &str) -> StoreResult<RawDocument> {
        self.check_bucket_name(StoreOp::Get, bucket, key)?;

        let bytes = fs::read(self.document_path(bucket, key)).map_err(|e| {
            if e.kind() == ErrorKind::NotFound {
                StoreError::not_found(bucket, key)
            } else {
                StoreError::io(StoreOp::Get, bucket, key, e)
            }
        })?;

        serde_json::from_slice(&bytes).map_err(|e| StoreError::corrupt(StoreOp::Get, bucket, key, e))
    }

    fn put(&self, bucket: &str, key: &str, document: &RawDocument) -> StoreResult<()> {
        self.check_bucket_name(StoreOp::Put, bucket, key)?;

        fs::create_dir_all(self.bucket_dir(bucket))
            .map_err(|e| StoreError::io(StoreOp::Put, bucket, key, e))?;

        let bytes = serde_json::to_vec(document)
            .map_err(|e| StoreError::corrupt(StoreOp::Put, bucket, key, e))?;

        // Write then rename so readers never see a half-written document.
        // Each write gets its own temp file; concurrent upserts of one key
        // must not share one.
        let path = self.document_path(bucket, key);
        let tmp = path.with_extension(format!("json.{}.tmp", Uuid::new_v4()));
        let written = fs::write(&tmp, bytes).and_then(|()| fs::rename(&tmp, &path));
        if let Err(e) = written {
            let _ = fs::remove_file(&tmp);
            return Err(StoreError::io(StoreOp::Put, bucket, key, e));
        }
        Ok(())
    }

    fn delete(&self, bucket: &str, key: &str) -> StoreResult<()> {
        self.check_bucket_name(StoreOp::Delete, bucket, key)?;

        fs::remove_file(self.document_path(bucket, key)).map_err(|e| {
            if e.kind() == ErrorKind::NotFound {
                StoreError::not_found(bucket, key)
            } else {
                StoreError::io(StoreOp::Delete, bucket, key, e)
            }
        })
    }

    fn exists(&self, bucket: &str, key: &str) -> StoreResult<bool> {
        self.check_bucket_name(StoreOp::Exists, bucket, key)?;

        self.document_path(bucket, key)
            .try_exists()
            .map_err(|e| StoreError::io(StoreOp::Exists, bucket, key, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;
    use tempfile::TempDir;

    fn create_test_store() -> (LocalStore, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let store = LocalStore::new(temp_dir.path().to_path_buf());
        (store, temp_dir)
    }

    #[test]
    fn test_put_get_roundtrip() {
        let (store, _temp) = create_test_store();
        let doc = RawDocument::new(b"{\"a\":1}".to_vec()).with_flags(0x02000000);

        store.put("travel", "route::1", &doc).unwrap();
        assert_eq!(store.get("travel", "route::1").unwrap(), doc);
    }

    #[test]
    fn test_key_with_separators() {
        let (store, temp) = create_test_store();
        let doc = RawDocument::new(b"x".to_vec());

        store.put("b", "../../etc/passwd", &doc).unwrap();
        assert_eq!(store.get("b", "../../etc/passwd").unwrap(), doc);

        let entries: Vec<_> = fs::read_dir(temp.path().join("b")).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn test_missing_is_not_found() {
        let (store, _temp) = create_test_store();
        assert!(store.get("b", "k").unwrap_err().is_not_found());
        assert!(store.delete("b", "k").unwrap_err().is_not_found());
        assert!(!store.exists("b", "k").unwrap());
    }

    #[test]
    fn test_empty_document_exists() {
        let (store, _temp) = create_test_store();
        store.put("b", "k", &RawDocument::default()).unwrap();

        assert!(store.exists("b", "k").unwrap());
        assert!(store.get("b", "k").unwrap().is_empty());
    }

    #[test]
    fn test_delete_removes_file() {
        let (store, _temp) = create_test_store();
        store.put("b", "k", &RawDocument::new(b"x".to_vec())).unwrap();

        store.delete("b", "k").unwrap();
        assert!(!store.exists("b", "k").unwrap());
    }

    #[test]
    fn test_bucket_traversal_rejected() {
        let (store, _temp) = create_test_store();
        let err = store.put("..", "k", &RawDocument::default()).unwrap_err();
        assert!(matches!(err, StoreError::UnknownBucket { .. }));
    }

    #[test]
    fn test_concurrent_puts_same_key() {
        let (store, temp) = create_test_store();
        let store = Arc::new(store);
        let doc = |fill: u8| RawDocument::new(vec![fill; 64 * 1024]);
        store.put("b", "k", &doc(0)).unwrap();

        let writers: Vec<_> = (1..=4u8)
            .map(|fill| {
                let store = store.clone();
                thread::spawn(move || {
                    for _ in 0..50 {
                        store.put("b", "k", &doc(fill)).unwrap();
                    }
                })
            })
            .collect();

        for _ in 0..500 {
            let read = store.get("b", "k").unwrap();
            assert_eq!(read.len(), 64 * 1024);
            assert!(read.value().iter().all(|b| *b == read.value()[0]));
        }

        for writer in writers {
            writer.join().unwrap();
        }

        // No temp files left behind
        let entries: Vec<_> = fs::read_dir(temp.path().join("b")).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn test_failed_put_leaves_no_temp_file() {
        let (store, temp) = create_test_store();
        let path = store.document_path("b", "k");
        // A directory where the document should go makes the rename fail
        fs::create_dir_all(&path).unwrap();
        fs::write(path.join("blocker"), b"x").unwrap();

        let err = store.put("b", "k", &RawDocument::new(b"v".to_vec())).unwrap_err();
        assert!(matches!(err, StoreError::Io { .. }));

        let entries: Vec<_> = fs::read_dir(temp.path().join("b")).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn test_corrupt_file_reported() {
        let (store, _temp) = create_test_store();
        store.put("b", "k", &RawDocument::default()).unwrap();
        fs::write(store.document_path("b", "k"), b"not json").unwrap();

        let err = store.get("b", "k").unwrap_err();
        assert!(matches!(err, StoreError::Corrupt { .. }));
    }
}
