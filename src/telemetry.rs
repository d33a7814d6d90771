//! Tracing initialization.
//!
//! The embedding service calls [`init`] once at startup; tests may call it
//! repeatedly, later calls are no-ops.

use tracing_subscriber::{fmt, EnvFilter};

/// Installs the global tracing subscriber.
///
/// Filtering follows `RUST_LOG` (default `info`). Output is compact
/// single-line fmt; deployments that need JSON logs can build their own
/// subscriber instead of calling this.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_is_idempotent() {
        init();
        init();
    }
}
