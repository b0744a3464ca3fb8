//! # Receiver HTTP Server
//!
//! Combines the replication endpoints and the health check behind basic
//! authentication, served over TLS.
//!
//! # Endpoints (paths come from configuration)
//!
//! - `POST upsert | remove | exists | get | null_data` - replication events
//! - `POST config_document` - the sender's stored configuration
//! - `GET healthcheck` - certificate watchdog status

pub mod auth;
pub mod config;
pub mod errors;
pub mod health_routes;
pub mod replication_routes;
pub mod server;

pub use config::{BasicAuthConfig, EndpointConfig, HttpServerConfig, TlsConfig};
pub use errors::{ServerError, ServerResult};
pub use health_routes::HealthResponse;
pub use replication_routes::ReplicationState;
pub use server::HttpServer;
