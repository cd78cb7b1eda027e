//! Observability for dict-api
//!
//! Installs the global `tracing` subscriber. Components emit events through
//! the `tracing` macros directly:
//!
//! - gateway: statements at `debug`, constraint violations at `warn`,
//!   store failures at `error`
//! - HTTP server: bind address at `info`, per-request spans via `TraceLayer`
//!
//! `RUST_LOG` takes precedence over the configured level.

use tracing_subscriber::EnvFilter;

/// Filter from `RUST_LOG`, falling back to `level`, then to `info`
pub fn env_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Install the fmt subscriber on stderr.
///
/// Safe to call more than once; later calls leave the first subscriber in place.
pub fn init_logging(level: &str) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter(level))
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_logging_twice() {
        init_logging("debug");
        init_logging("warn");
    }

    #[test]
    fn test_env_filter_falls_back_on_garbage() {
        // Must not panic regardless of RUST_LOG in the test environment
        let _ = env_filter("==");
    }
}
