//! # Observability
//!
//! Structured logging setup and error formatting for log events.
//!
//! Events are emitted with `tracing` throughout the crate; this module only
//! installs the subscriber once at startup.

use std::error::Error;

use thiserror::Error;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::{LogFormat, LoggingConfig};

/// Logging setup errors
#[derive(Debug, Error)]
pub enum ObservabilityError {
    #[error("Invalid log filter '{0}': {1}")]
    InvalidFilter(String, String),

    #[error("Logging already initialized: {0}")]
    AlreadyInitialized(String),
}

/// Install the global subscriber.
///
/// `RUST_LOG` wins over the configured level when set.
pub fn init_logging(config: &LoggingConfig) -> Result<(), ObservabilityError> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&config.level)
            .map_err(|e| ObservabilityError::InvalidFilter(config.level.clone(), e.to_string()))?,
    };

    let registry = tracing_subscriber::registry().with(filter);
    let result = match config.format {
        LogFormat::Json => registry.with(fmt::layer().json()).try_init(),
        LogFormat::Pretty => registry.with(fmt::layer().pretty()).try_init(),
    };

    result.map_err(|e| ObservabilityError::AlreadyInitialized(e.to_string()))
}

/// Render an error with its whole `source()` chain, outermost first
pub fn error_chain(err: &(dyn Error + 'static)) -> String {
    let mut out = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        // thiserror messages often already embed their source
        if !out.ends_with(&text) {
            out.push_str(" <- ");
            out.push_str(&text);
        }
        source = cause.source();
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::migration::MigrationError;
    use crate::store::{StoreError, StoreOp};

    #[derive(Debug, Error)]
    #[error("outer")]
    struct Outer(#[source] std::io::Error);

    #[test]
    fn test_chain_includes_sources() {
        let err = Outer(std::io::Error::new(std::io::ErrorKind::Other, "disk gone"));
        assert_eq!(error_chain(&err), "outer <- disk gone");
    }

    #[test]
    fn test_chain_skips_embedded_source() {
        let err = MigrationError::Store(StoreError::io(StoreOp::Put, "q", "k", "full"));
        let chain = error_chain(&err);
        assert_eq!(chain.matches("full").count(), 1);
    }

    #[test]
    fn test_invalid_filter_rejected() {
        let config = LoggingConfig {
            level: "receiver=verbose".to_string(),
            format: LogFormat::Json,
        };
        if std::env::var("RUST_LOG").is_err() {
            assert!(matches!(
                init_logging(&config),
                Err(ObservabilityError::InvalidFilter(_, _))
            ));
        }
    }
}
