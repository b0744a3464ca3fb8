//! Replication Endpoint Tests
//!
//! Drives the full router (auth layer included) the way the sender does:
//! - JSON bodies, plain or gzip-framed
//! - Basic credentials on every request
//! - Status flags and HTTP codes checked per endpoint

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use tempfile::TempDir;
use tower::ServiceExt;

use replication_receiver::config::ReceiverConfig;
use replication_receiver::document::{
    DocumentMetaData, GetDocumentResponse, RawDocument, ResponseResult, StatusFlag,
};
use replication_receiver::framing::{self, Compression};
use replication_receiver::http_server::{HealthResponse, HttpServer};
use replication_receiver::store::{DocumentStore, LocalStore, MemoryStore};
use replication_receiver::watchdog::{CertificateHealth, CertificateWatchdog};

const USER: &str = "sender";
const PASSWORD: &str = "s3cret";

// =============================================================================
// Helpers
// =============================================================================

fn config() -> ReceiverConfig {
    let mut config = ReceiverConfig::default();
    config.http_server.authorization.username = USER.into();
    config.http_server.authorization.password = PASSWORD.into();
    config
}

fn router_with(store: Arc<MemoryStore>, health: Arc<CertificateHealth>) -> Router {
    HttpServer::build_router(&config(), store, health)
}

fn router(store: Arc<MemoryStore>) -> Router {
    router_with(store, Arc::new(CertificateHealth::new()))
}

fn credentials() -> String {
    format!("Basic {}", STANDARD.encode(format!("{}:{}", USER, PASSWORD)))
}

fn meta(bucket: &str, key: &str, value: &[u8]) -> DocumentMetaData {
    DocumentMetaData::new(bucket, key, RawDocument::new(value.to_vec()))
}

fn post(path: &str, body: &DocumentMetaData, compression: Compression) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(path)
        .header(header::AUTHORIZATION, credentials())
        .header(header::CONTENT_TYPE, "application/json");
    if compression.is_gzip() {
        builder = builder
            .header(header::CONTENT_ENCODING, "gzip")
            .header(header::ACCEPT_ENCODING, "gzip");
    }
    let bytes = framing::encode(body, compression).unwrap();
    builder.body(Body::from(bytes)).unwrap()
}

async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, body.to_vec())
}

async fn call(router: &Router, path: &str, body: &DocumentMetaData) -> (StatusCode, ResponseResult) {
    let (status, bytes) = send(router, post(path, body, Compression::Identity)).await;
    (status, serde_json::from_slice(&bytes).unwrap())
}

// =============================================================================
// Upsert / Exists / Remove
// =============================================================================

#[tokio::test]
async fn test_upsert_then_exists() {
    let store = Arc::new(MemoryStore::new());
    let router = router(store.clone());

    let (status, result) = call(&router, "/upsert", &meta("travel", "airline_10", b"{\"id\":10}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(result.status(), StatusFlag::Success);
    assert_eq!(store.get("travel", "airline_10").unwrap().value(), b"{\"id\":10}");

    let (_, result) = call(&router, "/exists", &meta("travel", "airline_10", b"")).await;
    assert_eq!(result.status(), StatusFlag::DocumentExists);

    let (_, result) = call(&router, "/exists", &meta("travel", "airline_11", b"")).await;
    assert_eq!(result.status(), StatusFlag::DocumentNotExists);
}

#[tokio::test]
async fn test_upsert_keeps_metadata() {
    let store = Arc::new(MemoryStore::new());
    let router = router(store.clone());

    let document = RawDocument::new(b"v".to_vec()).with_flags(0x0200_0000).with_expiry(3600);
    let body = DocumentMetaData::new("travel", "k", document);
    call(&router, "/upsert", &body).await;

    let stored = store.get("travel", "k").unwrap();
    assert_eq!(stored.flags, 0x0200_0000);
    assert_eq!(stored.expiry, 3600);
}

#[tokio::test]
async fn test_remove_present_and_absent() {
    let store = Arc::new(MemoryStore::new());
    let router = router(store.clone());
    call(&router, "/upsert", &meta("travel", "k", b"v")).await;

    let (status, result) = call(&router, "/remove", &meta("travel", "k", b"")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(result.status(), StatusFlag::Success);
    assert!(!store.exists("travel", "k").unwrap());

    let (status, result) = call(&router, "/remove", &meta("travel", "k", b"")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(result.message(), "document not found");
}

// =============================================================================
// Get
// =============================================================================

#[tokio::test]
async fn test_get_reports_null_flag() {
    let store = Arc::new(MemoryStore::new());
    let router = router(store.clone());
    call(&router, "/upsert", &meta("travel", "full", b"abc")).await;
    call(&router, "/upsert", &meta("travel", "empty", b"")).await;

    let read = |key: &'static str| {
        let router = router.clone();
        async move {
            let (status, bytes) =
                send(&router, post("/get", &meta("travel", key, b""), Compression::Identity)).await;
            assert_eq!(status, StatusCode::OK);
            serde_json::from_slice::<GetDocumentResponse>(&bytes).unwrap()
        }
    };

    let full = read("full").await;
    assert_eq!(full.status(), StatusFlag::Success);
    assert!(!full.null_flag());
    assert_eq!(full.result().message(), GetDocumentResponse::HAS_CONTENT);

    let empty = read("empty").await;
    assert_eq!(empty.status(), StatusFlag::Success);
    assert!(empty.null_flag());
    assert_eq!(empty.result().message(), GetDocumentResponse::ZERO_LENGTH);

    let absent = read("absent").await;
    assert_eq!(absent.status(), StatusFlag::Success);
    assert!(!absent.null_flag());
    assert_eq!(absent.result().message(), GetDocumentResponse::NOT_FOUND);
}

#[tokio::test]
async fn test_get_wire_fields() {
    let router = router(Arc::new(MemoryStore::new()));
    call(&router, "/upsert", &meta("travel", "empty", b"")).await;

    let (_, bytes) = send(&router, post("/get", &meta("travel", "empty", b""), Compression::Identity)).await;
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

    assert_eq!(json["Status"], StatusFlag::Success.code());
    assert_eq!(json["NullFlag"], true);
    assert_eq!(json["SuccessMessage"], GetDocumentResponse::ZERO_LENGTH);
}

// =============================================================================
// Framing
// =============================================================================

#[tokio::test]
async fn test_gzip_request_gets_gzip_response() {
    let store = Arc::new(MemoryStore::new());
    let router = router(store.clone());

    let response = router
        .clone()
        .oneshot(post("/upsert", &meta("travel", "k", b"zipped"), Compression::Gzip))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_ENCODING], "gzip");

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let result: ResponseResult = framing::decode(&bytes, Compression::Gzip).unwrap();
    assert_eq!(result.status(), StatusFlag::Success);
    assert_eq!(store.get("travel", "k").unwrap().value(), b"zipped");
}

#[tokio::test]
async fn test_accept_encoding_without_content_encoding_stays_plain() {
    let router = router(Arc::new(MemoryStore::new()));
    let bytes = framing::encode(&meta("travel", "k", b"v"), Compression::Identity).unwrap();

    let request = Request::builder()
        .method("POST")
        .uri("/upsert")
        .header(header::AUTHORIZATION, credentials())
        .header(header::ACCEPT_ENCODING, "gzip")
        .body(Body::from(bytes))
        .unwrap();
    let response = router.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_ENCODING], "gzip");

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let result: ResponseResult = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(result.status(), StatusFlag::Success);
}

#[tokio::test]
async fn test_malformed_body_is_error() {
    let router = router(Arc::new(MemoryStore::new()));
    let request = Request::builder()
        .method("POST")
        .uri("/upsert")
        .header(header::AUTHORIZATION, credentials())
        .body(Body::from("{not json"))
        .unwrap();

    let (status, bytes) = send(&router, request).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let result: ResponseResult = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(result.status(), StatusFlag::Error);
}

#[tokio::test]
async fn test_claimed_gzip_with_plain_body_is_error() {
    let router = router(Arc::new(MemoryStore::new()));
    let bytes = framing::encode(&meta("travel", "k", b"v"), Compression::Identity).unwrap();
    let request = Request::builder()
        .method("POST")
        .uri("/upsert")
        .header(header::AUTHORIZATION, credentials())
        .header(header::CONTENT_ENCODING, "gzip")
        .body(Body::from(bytes))
        .unwrap();

    let (status, _) = send(&router, request).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_upserts_on_local_store() {
    let dir = TempDir::new().unwrap();
    let store = Arc::new(LocalStore::new(dir.path().to_path_buf()));
    let router = HttpServer::build_router(&config(), store.clone(), Arc::new(CertificateHealth::new()));

    let tasks: Vec<_> = (0..16u8)
        .map(|fill| {
            let router = router.clone();
            tokio::spawn(async move {
                let body = meta("travel", "hot_key", &vec![fill; 32 * 1024]);
                call(&router, "/upsert", &body).await
            })
        })
        .collect();

    for task in tasks {
        let (status, result) = task.await.unwrap();
        assert_eq!(status, StatusCode::OK);
        assert_eq!(result.status(), StatusFlag::Success);
    }

    let stored = store.get("travel", "hot_key").unwrap();
    assert_eq!(stored.len(), 32 * 1024);
}

// =============================================================================
// Null data / config document
// =============================================================================

#[tokio::test]
async fn test_null_data_moves_empty_document() {
    let store = Arc::new(MemoryStore::new());
    let router = router(store.clone());
    call(&router, "/upsert", &meta("travel", "k", b"")).await;

    let (status, result) = call(&router, "/nullData", &meta("travel", "k", b"")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(result.status(), StatusFlag::Success);
    assert_eq!(
        result.message(),
        "ReceiverSuccess: document inserted and deleted successfully, docKey= k \
         ,nullBucket: null_documents ,receiverBucket: travel"
    );

    assert!(!store.exists("travel", "k").unwrap());
    assert!(store.exists("null_documents", "k").unwrap());

    let (_, result) = call(&router, "/nullData", &meta("travel", "k", b"")).await;
    assert_eq!(result.status(), StatusFlag::DocumentNotExists);
    assert_eq!(
        result.message(),
        "ReceiverDocNotFound: document not found, docKey= k"
    );
}

#[tokio::test]
async fn test_null_data_leaves_content_alone() {
    let store = Arc::new(MemoryStore::new());
    let router = router(store.clone());
    call(&router, "/upsert", &meta("travel", "k", b"payload")).await;

    let (status, result) = call(&router, "/nullData", &meta("travel", "k", b"")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(result.status(), StatusFlag::DocumentExists);
    assert_eq!(
        result.message(),
        "ReceiverDocFoundWithContent: document found with content, docKey= k"
    );
    assert!(store.exists("travel", "k").unwrap());
    assert!(!store.exists("null_documents", "k").unwrap());
}

#[tokio::test]
async fn test_config_document() {
    let store = Arc::new(MemoryStore::new());
    let router = router(store.clone());
    let request = || {
        Request::builder()
            .method("POST")
            .uri("/cbToCbConfig")
            .header(header::AUTHORIZATION, credentials())
            .body(Body::empty())
            .unwrap()
    };

    let (status, bytes) = send(&router, request()).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let result: ResponseResult = serde_json::from_slice(&bytes).unwrap();
    assert!(result.is_error());

    store
        .put(
            "replication_config",
            "cb_to_cb_config",
            &RawDocument::new(br#"{"buckets":["travel"]}"#.to_vec()),
        )
        .unwrap();

    let (status, bytes) = send(&router, request()).await;
    assert_eq!(status, StatusCode::OK);
    let result: ResponseResult = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(result.status(), StatusFlag::Success);
    assert_eq!(result.message(), r#"{"buckets":["travel"]}"#);
}

// =============================================================================
// Authorization
// =============================================================================

#[tokio::test]
async fn test_missing_credentials_rejected() {
    let store = Arc::new(MemoryStore::new());
    let router = router(store.clone());
    let bytes = framing::encode(&meta("travel", "k", b"v"), Compression::Identity).unwrap();

    let request = Request::builder()
        .method("POST")
        .uri("/upsert")
        .body(Body::from(bytes))
        .unwrap();
    let response = router.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        response.headers()[header::WWW_AUTHENTICATE],
        r#"Basic realm="unauthorized""#
    );
    assert!(!store.exists("travel", "k").unwrap());
}

#[tokio::test]
async fn test_wrong_password_rejected() {
    let router = router(Arc::new(MemoryStore::new()));
    let request = Request::builder()
        .method("GET")
        .uri("/health")
        .header(
            header::AUTHORIZATION,
            format!("Basic {}", STANDARD.encode(format!("{}:wrong", USER))),
        )
        .body(Body::empty())
        .unwrap();

    let response = router.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

// =============================================================================
// Health
// =============================================================================

async fn health(router: &Router) -> (StatusCode, HealthResponse) {
    let request = Request::builder()
        .method("GET")
        .uri("/health")
        .header(header::AUTHORIZATION, credentials())
        .body(Body::empty())
        .unwrap();
    let (status, bytes) = send(router, request).await;
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_health_follows_certificate_rotation() {
    let dir = TempDir::new().unwrap();
    let cert = dir.path().join("server.crt");
    std::fs::write(&cert, b"-----BEGIN CERTIFICATE-----\nONE\n").unwrap();

    let health_cell = Arc::new(CertificateHealth::new());
    let watchdog = CertificateWatchdog::new(&cert, health_cell.clone());
    let router = router_with(Arc::new(MemoryStore::new()), health_cell);

    watchdog.check().await;
    let (status, body) = health(&router).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.message, "ssl certificate status is ok");

    std::fs::write(&cert, b"-----BEGIN CERTIFICATE-----\nTWO\n").unwrap();
    watchdog.check().await;
    let (status, body) = health(&router).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body.message, "new certificate found.");

    // Reading health does not reset it
    let (status, _) = health(&router).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}
