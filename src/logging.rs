//! Diagnostic logging to stderr.
//!
//! User-facing progress goes to stdout with `println!`; this layer is for
//! debugging and stays quiet (warn) unless asked.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Overrides `RUST_LOG` when set
pub const LOG_ENV: &str = "SESSIONSHARE_LOG";

fn build_filter(verbose: bool) -> EnvFilter {
    if verbose {
        return EnvFilter::new("sessionshare=debug");
    }
    EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("warn"))
}

/// Install the global subscriber. Safe to call more than once; later calls
/// are ignored.
pub fn init(verbose: bool) {
    let layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time();
    let _ = tracing_subscriber::registry()
        .with(build_filter(verbose))
        .with(layer)
        .try_init();
}

/// Initialize logging for tests (captured by the test harness)
#[cfg(test)]
fn init_test() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
