//! Tracing/logging setup shared by the demo binary and tests.

use tracing_subscriber::EnvFilter;

/// Initialize process-wide tracing.
///
/// Filtering comes from `RUST_LOG`, defaulting to `info`. Safe to call
/// multiple times; subsequent calls are no-ops.
pub fn init() {
    init_with_default_filter("info");
}

/// Initialize tracing with an explicit fallback filter (used by tests that
/// want a quieter or noisier default than `info`).
pub fn init_with_default_filter(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .try_init();
}
