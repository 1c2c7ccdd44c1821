//! Logging setup.
//!
//! Structured console logging via `tracing`, filtered through the
//! `RUST_LOG` environment variable (default `warn`). Diagnostics go to
//! stderr so they never mix with command output on stdout.

use tracing_subscriber::EnvFilter;

/// Initialize the global tracing subscriber.
///
/// Safe to call once per process; later calls are ignored.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
