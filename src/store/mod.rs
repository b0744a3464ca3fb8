//! # Store Gateway
//!
//! Get/put/delete/exists against the backing key-value store. Absence is
//! reported as [`StoreError::NotFound`] and nothing else; every other failure
//! carries the operation, bucket, and key it happened on.
//!
//! No retries happen here.

mod backend;
mod errors;
mod local;
mod memory;

pub use backend::{BucketFilter, DocumentStore};
pub use errors::{StoreError, StoreOp, StoreResult};
pub use local::LocalStore;
pub use memory::MemoryStore;
