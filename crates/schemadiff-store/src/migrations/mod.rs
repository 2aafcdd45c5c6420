//! Migration framework
//!
//! Provides:
//! - Migration runner with checksum verification
//! - Idempotent application
//! - Embedded SQL migrations

mod checksums;
mod embedded;
mod runner;

pub use checksums::{compute_checksum, sha256_hex};
pub use runner::{applied_migrations, apply_migrations};
