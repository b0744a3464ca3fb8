//! CLI command implementations
//!
//! Startup order for `start`:
//! 1. Load and validate configuration
//! 2. Install the log subscriber
//! 3. Open the document store
//! 4. Start the certificate watchdog (TLS only)
//! 5. Serve until Ctrl-C

use std::path::Path;
use std::sync::Arc;

use tracing::{info, warn};

use crate::config::{ReceiverConfig, StoreConfig, StoreKind};
use crate::http_server::HttpServer;
use crate::observability::init_logging;
use crate::store::{BucketFilter, DocumentStore, LocalStore, MemoryStore};
use crate::watchdog::{CertificateHealth, CertificateWatchdog, CheckSchedule};

use super::args::Command;
use super::errors::{CliError, CliResult};

/// Parse arguments and run the selected command
pub fn run() -> CliResult<()> {
    let cli = super::args::Cli::parse_args();
    run_command(cli.command)
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Start { config } => start(&config),
        Command::CheckConfig { config } => check_config(&config),
    }
}

/// Validate a configuration file
pub fn check_config(config_path: &Path) -> CliResult<()> {
    let config = ReceiverConfig::load(config_path)?;
    println!(
        "{}: ok (listening on {}, tls {})",
        config_path.display(),
        config.http_server.socket_addr(),
        if config.http_server.tls.is_some() { "on" } else { "off" }
    );
    Ok(())
}

/// Start the receiver and block until shutdown
pub fn start(config_path: &Path) -> CliResult<()> {
    let config = ReceiverConfig::load(config_path)?;
    init_logging(&config.logging)?;

    let store = open_store(&config.store)?;
    let health = Arc::new(CertificateHealth::new());

    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| CliError::boot_failed(format!("Failed to create tokio runtime: {}", e)))?;

    rt.block_on(async {
        let watchdog = match &config.http_server.tls {
            Some(tls) => {
                let schedule = CheckSchedule::parse(&config.watchdog.schedule)
                    .map_err(|e| CliError::config_error(e.to_string()))?;
                let watchdog = CertificateWatchdog::new(tls.cert_file.clone(), health.clone());
                Some(watchdog.spawn(schedule))
            }
            None => {
                warn!("no TLS certificate configured; certificate watchdog disabled");
                None
            }
        };

        let server = HttpServer::new(&config, store, health);
        info!(addr = %server.socket_addr(), "starting replication receiver");
        let served = server.start().await;

        if let Some(task) = watchdog {
            task.abort();
        }
        served.map_err(CliError::from)
    })
}

/// Open the configured document store
pub fn open_store(config: &StoreConfig) -> CliResult<Arc<dyn DocumentStore>> {
    let filter = BucketFilter::new(config.buckets.iter().cloned());

    match config.kind {
        StoreKind::Memory => {
            warn!("using in-memory store; documents are lost on restart");
            Ok(Arc::new(MemoryStore::with_buckets(filter)))
        }
        StoreKind::Local => {
            let root = config
                .root
                .clone()
                .ok_or_else(|| CliError::config_error("store.root is required for the local store"))?;
            std::fs::create_dir_all(&root).map_err(|e| {
                CliError::boot_failed(format!("Failed to create {}: {}", root.display(), e))
            })?;
            info!(root = %root.display(), "using local store");
            Ok(Arc::new(LocalStore::new(root).with_filter(filter)))
        }
    }
}
