//! Shared certificate health cell

use std::sync::{PoisonError, RwLock};

/// Message returned by the health endpoint while the certificate is unchanged
pub const HEALTHY_MESSAGE: &str = "ssl certificate status is ok";

/// Message recorded when the certificate on disk differs from the baseline
pub const ROTATED_MESSAGE: &str = "new certificate found.";

#[derive(Debug, Default)]
struct CertificateHealthState {
    expired: bool,
    message: String,
    baseline: Option<Vec<u8>>,
}

/// Point-in-time copy of the health flag for readers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HealthSnapshot {
    pub expired: bool,
    pub message: String,
}

impl HealthSnapshot {
    /// Message to report: the fixed ok text, or the recorded failure
    pub fn report_message(&self) -> &str {
        if self.expired {
            &self.message
        } else {
            HEALTHY_MESSAGE
        }
    }
}

/// Process-wide certificate health, written only by the watchdog.
///
/// Share it with `Arc`. A poisoned lock is recovered: every write replaces
/// whole fields, so a panic mid-update cannot leave a torn value behind.
#[derive(Debug, Default)]
pub struct CertificateHealth {
    state: RwLock<CertificateHealthState>,
}

impl CertificateHealth {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current flag and message
    pub fn snapshot(&self) -> HealthSnapshot {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        HealthSnapshot {
            expired: state.expired,
            message: state.message.clone(),
        }
    }

    pub fn is_expired(&self) -> bool {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .expired
    }

    pub fn has_baseline(&self) -> bool {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .baseline
            .is_some()
    }

    // Watchdog-side writers

    pub(crate) fn with_baseline<R>(&self, f: impl FnOnce(&[u8]) -> R) -> R {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        f(state.baseline.as_deref().unwrap_or_default())
    }

    pub(crate) fn seed_baseline(&self, bytes: Vec<u8>) {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        state.baseline = Some(bytes);
    }

    pub(crate) fn mark_healthy(&self) {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        state.expired = false;
        state.message.clear();
    }

    pub(crate) fn mark_expired(&self, message: impl Into<String>) {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        state.expired = true;
        state.message = message.into();
    }
}
