use std::io;
use tracing_subscriber::{fmt, EnvFilter};

fn filter_or(fallback: Option<&str>, default: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(fallback.unwrap_or(default)))
}

/// Initialize tracing subscriber with compact human-readable output.
/// - Respects `RUST_LOG` if set, otherwise `fallback`, otherwise `info`
/// - Writes to stdout
pub fn init_logging_default(fallback: Option<&str>) {
    let _ = fmt()
        .with_env_filter(filter_or(fallback, "info"))
        .with_target(false)
        .compact()
        .with_writer(io::stdout)
        .try_init();
}

/// Initialize tracing subscriber with JSON structured output.
/// - Respects `RUST_LOG` if set, otherwise `fallback`, otherwise `info,storage=debug`
/// - Writes to stdout for consistent container logging behavior
pub fn init_logging_json(fallback: Option<&str>) {
    let _ = fmt()
        .with_env_filter(filter_or(fallback, "info,storage=debug"))
        .with_target(false)
        .json()
        .with_writer(io::stdout)
        .try_init();
}
