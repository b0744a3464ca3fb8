//! # Replication Documents
//!
//! Wire types exchanged with the replication sender.
//!
//! Field names on the wire are PascalCase because the sender serializes its
//! structs without renaming; the Rust side keeps snake_case.

mod raw;
mod response;

pub use raw::RawDocument;
pub use response::{GetDocumentResponse, ResponseResult, StatusFlag};

use serde::{Deserialize, Serialize};

/// Target of a single mutation event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DocumentMetaData {
    /// Document key within the bucket
    #[serde(default)]
    pub key: String,

    /// Bucket the event applies to
    #[serde(default)]
    pub bucket: String,

    /// Payload plus store metadata needed for a faithful put
    #[serde(default)]
    pub document: RawDocument,
}

impl DocumentMetaData {
    /// Create metadata for a document
    pub fn new(bucket: impl Into<String>, key: impl Into<String>, document: RawDocument) -> Self {
        Self {
            key: key.into(),
            bucket: bucket.into(),
            document,
        }
    }
}
