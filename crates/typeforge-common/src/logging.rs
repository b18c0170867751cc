//! Logging setup, shared by every binary entry point.
//!
//! Grounded on `tsz-cli::trace`: a single `init()` that installs a
//! `tracing_subscriber` filtered by `RUST_LOG`, defaulting to `warn`.

use tracing_subscriber::EnvFilter;

/// Install the global tracing subscriber. Safe to call more than once;
/// later calls are no-ops (mirrors `tracing`'s own guidance for
/// `set_global_default`).
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);
}
