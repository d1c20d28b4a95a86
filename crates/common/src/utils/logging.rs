use std::io;
use tracing_subscriber::{fmt, EnvFilter};

/// Filter used when `RUST_LOG` is unset and no override is configured.
pub const DEFAULT_FILTER: &str = "info,tower_http=info,axum=info,sqlx=warn";

fn env_filter(fallback: Option<&str>) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(fallback.unwrap_or(DEFAULT_FILTER)))
}

/// Initialize tracing subscriber with sensible defaults and stdout writer.
/// - Respects `RUST_LOG` if set
/// - Falls back to [`DEFAULT_FILTER`]
pub fn init_logging_default() {
    init_logging_compact(None);
}

/// Compact human-readable output; `fallback` replaces the default filter.
pub fn init_logging_compact(fallback: Option<&str>) {
    let _ = fmt()
        .with_env_filter(env_filter(fallback))
        .with_target(false)
        .compact()
        .with_writer(io::stdout)
        .try_init();
}

/// Initialize tracing subscriber with JSON structured output.
/// - Respects `RUST_LOG` if set
/// - Writes to stdout for consistent container logging behavior
pub fn init_logging_json(fallback: Option<&str>) {
    let _ = fmt()
        .with_env_filter(env_filter(fallback))
        .with_target(false)
        .json()
        .with_writer(io::stdout)
        .try_init();
}
