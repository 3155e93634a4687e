//! Logging initialization.
//!
//! The library logs through `tracing`; binaries call [`init_logging`]
//! once at startup. The filter honors `RUST_LOG` and defaults to `info`.

use tracing_subscriber::EnvFilter;

/// Installs the global tracing subscriber.
///
/// Safe to call once per process; later calls are ignored so tests that
/// share a process do not panic.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_is_idempotent() {
        init_logging();
        init_logging();
    }
}
