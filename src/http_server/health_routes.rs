//! Health HTTP Routes
//!
//! Reports the certificate watchdog's flag. Reading never changes it.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::watchdog::CertificateHealth;

/// Health check response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub message: String,
}

/// Create the health route at the configured path
pub fn health_routes(path: &str, health: Arc<CertificateHealth>) -> Router {
    Router::new()
        .route(path, get(health_handler))
        .with_state(health)
}

/// Health check handler
async fn health_handler(
    State(health): State<Arc<CertificateHealth>>,
) -> (StatusCode, Json<HealthResponse>) {
    let snapshot = health.snapshot();
    let response = HealthResponse {
        message: snapshot.report_message().to_string(),
    };

    if snapshot.expired {
        error!(message = %snapshot.message, "health check failed");
        (StatusCode::INTERNAL_SERVER_ERROR, Json(response))
    } else {
        info!("ssl certificate status is ok");
        (StatusCode::OK, Json(response))
    }
}
