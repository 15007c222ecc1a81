//! Tracing/logging initialization.
//!
//! Filtering comes from `RUST_LOG`; the catalog crates log at `info` for fetch
//! start/finish, `warn` per retry and `debug` for backoff delays.

use tracing_subscriber::EnvFilter;

const DEFAULT_DIRECTIVE: &str = "info";

fn env_filter(default: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
}

/// JSON logs + timestamps, configurable via RUST_LOG.
///
/// Safe to call multiple times (subsequent calls are no-ops).
pub fn init() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter(DEFAULT_DIRECTIVE))
        .json()
        .with_timer(tracing_subscriber::fmt::time::SystemTime)
        .with_target(false)
        .try_init();
}

/// Compact output captured per test; defaults to `debug` so retry and
/// backoff decisions show up in failing test output.
pub fn init_for_tests() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter("debug"))
        .with_test_writer()
        .compact()
        .try_init();
}
