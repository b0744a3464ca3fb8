//! # Certificate Watchdog
//!
//! A background task that re-reads the TLS certificate on a cron schedule
//! and compares it byte-for-byte against the copy seen on the first
//! successful read. Any change marks the process unhealthy until the file
//! matches the baseline again (the running listener still serves the old
//! certificate, so a restart is needed to pick up the new one).
//!
//! This is a content-rotation detector. It does not parse the certificate or
//! look at its validity dates.
//!
//! [`CertificateHealth`] is the only shared state: the watchdog writes it,
//! the health endpoint reads snapshots of it.

mod checker;
mod errors;
mod health;
mod schedule;

pub use checker::{CertificateWatchdog, CheckOutcome};
pub use errors::{WatchdogError, WatchdogResult};
pub use health::{CertificateHealth, HealthSnapshot};
pub use schedule::CheckSchedule;
