//! # HTTP Server
//!
//! Builds the router and runs the listener.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum_server::tls_rustls::RustlsConfig;
use axum_server::Handle;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::config::ReceiverConfig;
use crate::store::DocumentStore;
use crate::watchdog::CertificateHealth;

use super::auth::{require_basic_auth, BasicAuth};
use super::config::HttpServerConfig;
use super::errors::{ServerError, ServerResult};
use super::health_routes::health_routes;
use super::replication_routes::{replication_routes, ReplicationState};

const SHUTDOWN_GRACE: Duration = Duration::from_secs(10);

/// HTTP server for the replication receiver
pub struct HttpServer {
    config: HttpServerConfig,
    router: Router,
}

impl HttpServer {
    /// Create a server over the given store and health cell
    pub fn new(
        config: &ReceiverConfig,
        store: Arc<dyn DocumentStore>,
        health: Arc<CertificateHealth>,
    ) -> Self {
        let router = Self::build_router(config, store, health);
        Self {
            config: config.http_server.clone(),
            router,
        }
    }

    /// Build the combined router with all endpoints
    pub fn build_router(
        config: &ReceiverConfig,
        store: Arc<dyn DocumentStore>,
        health: Arc<CertificateHealth>,
    ) -> Router {
        let replication_state = Arc::new(ReplicationState::new(
            store,
            config.store.null_document_bucket.clone(),
            config.store.config_bucket.clone(),
            config.store.config_document_key.clone(),
        ));
        let auth = Arc::new(BasicAuth::new(&config.http_server.authorization));

        Router::new()
            .merge(replication_routes(&config.endpoints, replication_state))
            .merge(health_routes(&config.endpoints.healthcheck, health))
            .layer(axum::middleware::from_fn_with_state(auth, require_basic_auth))
            .layer(TraceLayer::new_for_http())
    }

    /// Get the socket address
    pub fn socket_addr(&self) -> String {
        self.config.socket_addr()
    }

    /// Get the router (for testing)
    pub fn router(self) -> Router {
        self.router
    }

    /// Serve until Ctrl-C
    pub async fn start(self) -> ServerResult<()> {
        let addr: SocketAddr = self
            .config
            .socket_addr()
            .parse()
            .map_err(|_| ServerError::InvalidAddress(self.config.socket_addr()))?;

        let handle = Handle::new();
        tokio::spawn(shutdown_on_ctrl_c(handle.clone()));

        let service = self.router.into_make_service();
        match &self.config.tls {
            Some(tls) => {
                let rustls = RustlsConfig::from_pem_file(&tls.cert_file, &tls.key_file)
                    .await
                    .map_err(ServerError::Tls)?;

                info!(%addr, "receiver was started");
                axum_server::bind_rustls(addr, rustls)
                    .handle(handle)
                    .serve(service)
                    .await?;
            }
            None => {
                warn!(%addr, "TLS is not configured; serving plain HTTP");
                axum_server::bind(addr).handle(handle).serve(service).await?;
            }
        }

        info!("receiver stopped");
        Ok(())
    }
}

async fn shutdown_on_ctrl_c(handle: Handle) {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("shutdown requested");
        handle.graceful_shutdown(Some(SHUTDOWN_GRACE));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn test_config() -> ReceiverConfig {
        let mut config = ReceiverConfig::default();
        config.http_server = HttpServerConfig::with_port(9443);
        config
    }

    #[test]
    fn test_server_creation() {
        let server = HttpServer::new(
            &test_config(),
            Arc::new(MemoryStore::new()),
            Arc::new(CertificateHealth::new()),
        );
        assert_eq!(server.socket_addr(), "0.0.0.0:9443");
    }

    #[test]
    fn test_router_builds() {
        let server = HttpServer::new(
            &test_config(),
            Arc::new(MemoryStore::new()),
            Arc::new(CertificateHealth::new()),
        );
        let _router = server.router();
    }
}
