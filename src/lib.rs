//! replication-receiver - receiving end of a cross-cluster document replication link
//!
//! A sender posts document mutations over authenticated HTTP(S); the receiver
//! applies them to a key-value store, quarantines documents that arrive empty,
//! and reports whether its TLS certificate has been rotated underneath it.

pub mod cli;
pub mod config;
pub mod document;
pub mod framing;
pub mod http_server;
pub mod migration;
pub mod observability;
pub mod store;
pub mod watchdog;
