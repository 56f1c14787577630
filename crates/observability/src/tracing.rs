//! Tracing/logging initialization.
//!
//! Analysis runs log at `info` (cycle start/finish, run ids), per-item
//! scoring problems at `warn`, training epoch losses at `debug`. Tune with
//! `RUST_LOG`, e.g. `RUST_LOG=restock_analysis=debug`.

use tracing_subscriber::EnvFilter;

/// Initialize tracing/logging for the process.
///
/// Safe to call multiple times (subsequent calls are no-ops).
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    // JSON logs + timestamps, configurable via RUST_LOG.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .json()
        .with_timer(tracing_subscriber::fmt::time::SystemTime)
        .with_target(false)
        .try_init();
}
