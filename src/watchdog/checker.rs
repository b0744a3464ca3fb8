//! Certificate comparison task

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::Utc;
use sha2::{Digest, Sha256};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use super::health::{CertificateHealth, ROTATED_MESSAGE};
use super::schedule::CheckSchedule;

/// Result of a single check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckOutcome {
    /// First successful read; no judgment made this cycle
    BaselineSeeded,
    /// File matches the baseline
    Unchanged,
    /// File differs from the baseline
    Rotated,
    /// The file could not be read
    ReadFailed(String),
}

/// Periodic certificate comparison, the sole writer of [`CertificateHealth`]
#[derive(Debug)]
pub struct CertificateWatchdog {
    cert_path: PathBuf,
    health: Arc<CertificateHealth>,
}

impl CertificateWatchdog {
    pub fn new(cert_path: impl Into<PathBuf>, health: Arc<CertificateHealth>) -> Self {
        Self {
            cert_path: cert_path.into(),
            health,
        }
    }

    pub fn cert_path(&self) -> &Path {
        &self.cert_path
    }

    /// Read the certificate once and update the health cell
    pub async fn check(&self) -> CheckOutcome {
        let current = match tokio::fs::read(&self.cert_path).await {
            Ok(bytes) => bytes,
            Err(e) => {
                let message = format!("failed to read {}: {}", self.cert_path.display(), e);
                error!(path = %self.cert_path.display(), error = %e, "certificate read failed");
                self.health.mark_expired(message.clone());
                return CheckOutcome::ReadFailed(message);
            }
        };

        if !self.health.has_baseline() {
            debug!(length = current.len(), "certificate baseline cached");
            self.health.seed_baseline(current);
            return CheckOutcome::BaselineSeeded;
        }

        let (unchanged, baseline_fingerprint) = self
            .health
            .with_baseline(|baseline| (baseline == current.as_slice(), fingerprint(baseline)));

        if unchanged {
            self.health.mark_healthy();
            debug!(length = current.len(), "certificate unchanged");
            CheckOutcome::Unchanged
        } else {
            warn!(
                path = %self.cert_path.display(),
                baseline = %baseline_fingerprint,
                current = %fingerprint(&current),
                "new certificate found"
            );
            self.health.mark_expired(ROTATED_MESSAGE);
            CheckOutcome::Rotated
        }
    }

    /// Run one check now, then one per schedule tick, until the task is aborted
    pub fn spawn(self, schedule: CheckSchedule) -> JoinHandle<()> {
        tokio::spawn(async move {
            info!(
                path = %self.cert_path.display(),
                schedule = schedule.pattern(),
                "certificate watchdog started"
            );
            self.check().await;

            loop {
                let delay = match schedule.delay_from(&Utc::now()) {
                    Ok(delay) => delay,
                    Err(e) => {
                        error!(error = %e, "certificate watchdog stopped");
                        return;
                    }
                };
                tokio::time::sleep(delay).await;

                let outcome = self.check().await;
                debug!(?outcome, expired = self.health.is_expired(), "certificate check");
            }
        })
    }
}

fn fingerprint(bytes: &[u8]) -> String {
    format!("{:x}", Sha256::digest(bytes))
}
