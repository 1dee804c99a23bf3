//! Shared building blocks for the cumulus workspace.
//!
//! - [`CoinbaseEnvironment`]: sandbox or production base URLs
//! - [`RetryPolicy`]: bounded, fixed-delay retry schedule for order placement
//! - [`init_logging`]: tracing subscriber setup used by the binary

mod environment;
mod retry;

pub use environment::{CoinbaseEnvironment, ParseEnvironmentError};
pub use retry::RetryPolicy;

use tracing_subscriber::{fmt, EnvFilter};

/// Default filter when `RUST_LOG` is not set.
const DEFAULT_LOG_FILTER: &str = "info";

/// Initialize the global tracing subscriber with human-readable output.
///
/// `RUST_LOG` overrides the default `info` filter.
pub fn init_logging() {
    fmt().with_env_filter(env_filter()).init();
}

/// Initialize the global tracing subscriber with JSON output.
pub fn init_json_logging() {
    fmt().json().with_env_filter(env_filter()).init();
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER))
}
