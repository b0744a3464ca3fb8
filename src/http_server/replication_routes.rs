//! Replication HTTP Routes
//!
//! One POST handler per mutation event. Every handler follows the same shape:
//! pick the framing from `Content-Encoding`, decode the body, call the store
//! or the migration workflow, then encode the result with the same framing.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use serde::Serialize;
use tracing::{debug, error};

use crate::document::{DocumentMetaData, GetDocumentResponse, ResponseResult};
use crate::framing::{self, Compression, FramingError};
use crate::migration::{MigrationError, MigrationOutcome, NullDocumentMigrator};
use crate::observability::error_chain;
use crate::store::{DocumentStore, StoreError};

use super::config::EndpointConfig;

// ==================
// Shared State
// ==================

/// State shared by the replication handlers
#[derive(Debug)]
pub struct ReplicationState {
    store: Arc<dyn DocumentStore>,
    migrator: NullDocumentMigrator,
    config_bucket: String,
    config_document_key: String,
}

impl ReplicationState {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        null_document_bucket: impl Into<String>,
        config_bucket: impl Into<String>,
        config_document_key: impl Into<String>,
    ) -> Self {
        let migrator = NullDocumentMigrator::new(store.clone(), null_document_bucket);
        Self {
            store,
            migrator,
            config_bucket: config_bucket.into(),
            config_document_key: config_document_key.into(),
        }
    }

    /// Insert or overwrite a document
    pub fn upsert(&self, meta: &DocumentMetaData) -> Reply {
        debug!(bucket = %meta.bucket, key = %meta.key, length = meta.document.len(), "upsert");
        match self.store.put(&meta.bucket, &meta.key, &meta.document) {
            Ok(()) => Reply::ok(ResponseResult::success("document inserted successfully")),
            Err(e) => store_failure(&e),
        }
    }

    /// Remove a document; removing an absent key succeeds
    pub fn remove(&self, meta: &DocumentMetaData) -> Reply {
        debug!(bucket = %meta.bucket, key = %meta.key, "remove");
        match self.store.delete(&meta.bucket, &meta.key) {
            Ok(()) => Reply::ok(ResponseResult::success("document removed successfully")),
            Err(e) if e.is_not_found() => Reply::ok(ResponseResult::success("document not found")),
            Err(e) => store_failure(&e),
        }
    }

    /// Report whether a key is present
    pub fn exists(&self, meta: &DocumentMetaData) -> Reply {
        match self.store.exists(&meta.bucket, &meta.key) {
            Ok(found) => {
                debug!(bucket = %meta.bucket, key = %meta.key, found, "exists");
                if found {
                    Reply::ok(ResponseResult::DocumentExists("document found".into()))
                } else {
                    Reply::ok(ResponseResult::DocumentNotExists("document not found".into()))
                }
            }
            Err(e) => store_failure(&e),
        }
    }

    /// Fetch a document and report whether its payload is empty
    pub fn get(&self, meta: &DocumentMetaData) -> Reply {
        match self.store.get(&meta.bucket, &meta.key) {
            Ok(document) => {
                debug!(bucket = %meta.bucket, key = %meta.key, length = document.len(), "get");
                let response = if document.is_empty() {
                    GetDocumentResponse::empty()
                } else {
                    GetDocumentResponse::with_content()
                };
                Reply::ok(response)
            }
            Err(e) if e.is_not_found() => Reply::ok(GetDocumentResponse::not_found()),
            Err(e) => store_failure(&e),
        }
    }

    /// Move the document to quarantine if its payload is empty
    pub fn null_data(&self, meta: &DocumentMetaData) -> Reply {
        let key = &meta.key;
        match self.migrator.migrate(&meta.bucket, key) {
            Ok(MigrationOutcome::NotFound) => Reply::ok(ResponseResult::DocumentNotExists(format!(
                "ReceiverDocNotFound: document not found, docKey= {}",
                key
            ))),
            Ok(MigrationOutcome::HasContent { .. }) => Reply::ok(ResponseResult::DocumentExists(
                format!("ReceiverDocFoundWithContent: document found with content, docKey= {}", key),
            )),
            Ok(MigrationOutcome::Migrated { .. }) => Reply::ok(ResponseResult::success(format!(
                "ReceiverSuccess: document inserted and deleted successfully, docKey= {} ,nullBucket: {} ,receiverBucket: {}",
                key,
                self.migrator.quarantine_bucket(),
                meta.bucket
            ))),
            Err(e) => migration_failure(&e),
        }
    }

    /// Return the sender's configuration document as text
    pub fn config_document(&self) -> Reply {
        match self
            .store
            .get(&self.config_bucket, &self.config_document_key)
        {
            Ok(document) => Reply::ok(ResponseResult::success(
                String::from_utf8_lossy(document.value()).into_owned(),
            )),
            Err(e) => store_failure(&e),
        }
    }
}

// ==================
// Replies
// ==================

/// Body of a reply
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ReplyBody {
    Result(ResponseResult),
    Document(GetDocumentResponse),
}

impl From<ResponseResult> for ReplyBody {
    fn from(result: ResponseResult) -> Self {
        ReplyBody::Result(result)
    }
}

impl From<GetDocumentResponse> for ReplyBody {
    fn from(response: GetDocumentResponse) -> Self {
        ReplyBody::Document(response)
    }
}

/// Status code plus body, before framing
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    pub status: StatusCode,
    pub body: ReplyBody,
}

impl Reply {
    fn ok(body: impl Into<ReplyBody>) -> Self {
        Self {
            status: StatusCode::OK,
            body: body.into(),
        }
    }

    fn error(message: impl Into<String>) -> Self {
        Self::failure(500, message)
    }

    /// `Error` envelope with the status code chosen by the error type
    fn failure(status_code: u16, message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::from_u16(status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            body: ResponseResult::error(message).into(),
        }
    }
}

fn store_failure(e: &StoreError) -> Reply {
    error!(error = %error_chain(e), "store operation failed");
    Reply::failure(e.status_code(), e.to_string())
}

fn migration_failure(e: &MigrationError) -> Reply {
    if e.is_inconsistent() {
        error!(error = %error_chain(e), inconsistent = true, "null document migration left a duplicate");
    } else {
        error!(error = %error_chain(e), "null document migration failed");
    }
    Reply::failure(e.status_code(), e.to_string())
}

/// Run a store-bound operation on the blocking pool.
///
/// Backends do synchronous I/O, so it must stay off the async workers.
async fn run_blocking<F>(state: Arc<ReplicationState>, op: F) -> Reply
where
    F: FnOnce(&ReplicationState) -> Reply + Send + 'static,
{
    tokio::task::spawn_blocking(move || op(&state))
        .await
        .unwrap_or_else(|e| {
            error!(error = %e, "replication task failed");
            Reply::error(format!("replication task failed: {}", e))
        })
}

// ==================
// Framing
// ==================

/// Framing decided from the request headers
#[derive(Debug, Clone)]
pub struct RequestFraming {
    compression: Compression,
    accept_encoding: Option<HeaderValue>,
}

impl RequestFraming {
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let content_encoding = headers
            .get(header::CONTENT_ENCODING)
            .and_then(|v| v.to_str().ok());
        Self {
            compression: Compression::from_content_encoding(content_encoding),
            accept_encoding: headers.get(header::ACCEPT_ENCODING).cloned(),
        }
    }

    pub fn compression(&self) -> Compression {
        self.compression
    }

    /// Decode the body, or produce the error response to send instead
    pub fn decode(&self, body: &[u8]) -> Result<DocumentMetaData, Response> {
        framing::decode(body, self.compression).map_err(|e| {
            error!(error = %error_chain(&e), compression = ?self.compression, "request decode failed");
            self.respond(Reply::failure(e.status_code(), e.to_string()))
        })
    }

    /// Encode a reply with the request's framing.
    ///
    /// `Content-Encoding` echoes the request's `Accept-Encoding` as-is; the
    /// known sender relies on that.
    pub fn respond(&self, reply: Reply) -> Response {
        let (status, body) = match framing::encode(&reply.body, self.compression) {
            Ok(body) => (reply.status, body),
            Err(e) => encode_failure(&e),
        };

        let mut response = (status, body).into_response();
        let headers = response.headers_mut();
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
        if let Some(accept) = &self.accept_encoding {
            headers.insert(header::CONTENT_ENCODING, accept.clone());
        }
        response
    }
}

// Falls back to an uncompressed error envelope
fn encode_failure(e: &FramingError) -> (StatusCode, Vec<u8>) {
    error!(error = %error_chain(e), "response encode failed");
    let fallback = ResponseResult::error(e.to_string());
    (
        StatusCode::from_u16(e.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
        serde_json::to_vec(&fallback).unwrap_or_default(),
    )
}

// ==================
// Replication Routes
// ==================

/// Create replication routes at the configured paths
pub fn replication_routes(endpoints: &EndpointConfig, state: Arc<ReplicationState>) -> Router {
    Router::new()
        .route(&endpoints.upsert, post(upsert_handler))
        .route(&endpoints.remove, post(remove_handler))
        .route(&endpoints.exists, post(exists_handler))
        .route(&endpoints.get, post(get_handler))
        .route(&endpoints.null_data, post(null_data_handler))
        .route(&endpoints.config_document, post(config_document_handler))
        .with_state(state)
}

async fn upsert_handler(
    State(state): State<Arc<ReplicationState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let framing = RequestFraming::from_headers(&headers);
    match framing.decode(&body) {
        Ok(meta) => framing.respond(run_blocking(state, move |s| s.upsert(&meta)).await),
        Err(response) => response,
    }
}

async fn remove_handler(
    State(state): State<Arc<ReplicationState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let framing = RequestFraming::from_headers(&headers);
    match framing.decode(&body) {
        Ok(meta) => framing.respond(run_blocking(state, move |s| s.remove(&meta)).await),
        Err(response) => response,
    }
}

async fn exists_handler(
    State(state): State<Arc<ReplicationState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let framing = RequestFraming::from_headers(&headers);
    match framing.decode(&body) {
        Ok(meta) => framing.respond(run_blocking(state, move |s| s.exists(&meta)).await),
        Err(response) => response,
    }
}

async fn get_handler(
    State(state): State<Arc<ReplicationState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let framing = RequestFraming::from_headers(&headers);
    match framing.decode(&body) {
        Ok(meta) => framing.respond(run_blocking(state, move |s| s.get(&meta)).await),
        Err(response) => response,
    }
}

async fn null_data_handler(
    State(state): State<Arc<ReplicationState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let framing = RequestFraming::from_headers(&headers);
    match framing.decode(&body) {
        Ok(meta) => framing.respond(run_blocking(state, move |s| s.null_data(&meta)).await),
        Err(response) => response,
    }
}

async fn config_document_handler(
    State(state): State<Arc<ReplicationState>>,
    headers: HeaderMap,
) -> Response {
    let framing = RequestFraming::from_headers(&headers);
    framing.respond(run_blocking(state, |s| s.config_document()).await)
}
