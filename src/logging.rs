//! Logging configuration and initialization
//!
//! Embedding services (status endpoint, task workers) call this once at
//! startup; the library itself only emits `tracing` events.

use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Initialize tracing for an embedding service.
///
/// The filter comes from `RUST_LOG`, falling back to `default_level`.
pub fn init_logging(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt().with_env_filter(filter).init();

    debug!("Logging initialized");
}
