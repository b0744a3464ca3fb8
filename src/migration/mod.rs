//! # Null Document Migration
//!
//! Moves documents whose payload became empty out of their bucket and into a
//! quarantine bucket.
//!
//! ```text
//! Fetch ──not found──────────────────────────▶ NotFound
//!   │  ──store error─────────────────────────▶ Error (source untouched)
//!   ▼
//! Inspect ──len > 0──────────────────────────▶ HasContent
//!   │ len == 0
//!   ▼
//! put(quarantine) ──fails────────────────────▶ Error (source untouched)
//!   │
//!   ▼
//! delete(source) ──fails─────────────────────▶ Inconsistent (copy in both buckets)
//!   │
//!   ▼
//! Migrated
//! ```
//!
//! The two steps are not atomic. Between them the document exists in both
//! buckets; a failed delete leaves it there and is reported as
//! [`MigrationError::Inconsistent`]. Re-running from `Fetch` is safe because
//! the quarantine put is an overwrite.

mod errors;
mod workflow;

pub use errors::{MigrationError, MigrationResult};
pub use workflow::{MigrationOutcome, NullDocumentMigrator};
