//! Migration state machine

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::store::DocumentStore;

use super::errors::{MigrationError, MigrationResult};

/// Terminal states of a successful run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MigrationOutcome {
    /// The key is absent from the source bucket
    NotFound,

    /// The document has content; nothing moved
    HasContent { length: usize },

    /// The empty document now lives only in the quarantine bucket
    Migrated { relocation_id: Uuid },
}

/// Relocates empty documents to the quarantine bucket
#[derive(Debug)]
pub struct NullDocumentMigrator {
    store: Arc<dyn DocumentStore>,
    quarantine_bucket: String,
    in_flight: Mutex<HashSet<(String, String)>>,
}

impl NullDocumentMigrator {
    /// Create a migrator writing into `quarantine_bucket`
    pub fn new(store: Arc<dyn DocumentStore>, quarantine_bucket: impl Into<String>) -> Self {
        Self {
            store,
            quarantine_bucket: quarantine_bucket.into(),
            in_flight: Mutex::new(HashSet::new()),
        }
    }

    pub fn quarantine_bucket(&self) -> &str {
        &self.quarantine_bucket
    }

    /// Run the workflow for one document
    pub fn migrate(&self, bucket: &str, key: &str) -> MigrationResult<MigrationOutcome> {
        if bucket == self.quarantine_bucket {
            return Err(MigrationError::SourceIsQuarantine(bucket.to_string()));
        }

        let _guard = self.claim(bucket, key)?;

        // Fetch
        let document = match self.store.get(bucket, key) {
            Ok(document) => document,
            Err(e) if e.is_not_found() => {
                debug!(bucket, key, "null document check: not found");
                return Ok(MigrationOutcome::NotFound);
            }
            Err(e) => return Err(MigrationError::Store(e)),
        };

        // Inspect
        debug!(bucket, key, length = document.len(), "null document check");
        if !document.is_empty() {
            return Ok(MigrationOutcome::HasContent {
                length: document.len(),
            });
        }

        let relocation_id = Uuid::new_v4();
        let quarantine = self.quarantine_bucket.as_str();

        self.store.put(quarantine, key, &document).map_err(|e| {
            warn!(%relocation_id, bucket, key, quarantine, error = %e, "quarantine insert failed");
            MigrationError::Store(e)
        })?;

        match self.store.delete(bucket, key) {
            Ok(()) => {}
            // Someone else removed the source already; the goal state holds
            Err(e) if e.is_not_found() => {
                debug!(%relocation_id, bucket, key, "source already removed");
            }
            Err(cause) => {
                error!(
                    %relocation_id,
                    bucket,
                    key,
                    quarantine,
                    error = %cause,
                    "document left in both buckets"
                );
                return Err(MigrationError::Inconsistent {
                    key: key.to_string(),
                    source_bucket: bucket.to_string(),
                    quarantine_bucket: self.quarantine_bucket.clone(),
                    relocation_id,
                    cause,
                });
            }
        }

        info!(%relocation_id, bucket, key, quarantine, "empty document moved to quarantine");
        Ok(MigrationOutcome::Migrated { relocation_id })
    }

    fn claim(&self, bucket: &str, key: &str) -> MigrationResult<InFlightGuard<'_>> {
        let entry = (bucket.to_string(), key.to_string());
        let mut in_flight = self
            .in_flight
            .lock()
            .map_err(|_| MigrationError::Internal("Lock poisoned".into()))?;

        if !in_flight.insert(entry.clone()) {
            return Err(MigrationError::InFlight {
                bucket: entry.0,
                key: entry.1,
            });
        }

        Ok(InFlightGuard {
            set: &self.in_flight,
            entry,
        })
    }
}

/// Releases the per-key claim when the run ends
struct InFlightGuard<'a> {
    set: &'a Mutex<HashSet<(String, String)>>,
    entry: (String, String),
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        if let Ok(mut set) = self.set.lock() {
            set.remove(&self.entry);
        }
    }
}
