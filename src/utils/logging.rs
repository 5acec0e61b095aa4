// src/utils/logging.rs
use tracing_subscriber::{fmt, EnvFilter};

/// Sets up the logging framework using tracing_subscriber.
/// Reads log level filters from the `RUST_LOG` environment variable and
/// falls back to `default_directive` (e.g. "info") when it is not set.
pub fn setup_logging(default_directive: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));

    // try_init so a second call (tests, embedding callers) is a no-op
    let _ = fmt().with_env_filter(filter).try_init();

    tracing::debug!("Logging setup complete.");
}
