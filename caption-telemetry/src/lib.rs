//! Tracing setup shared by binaries.

#![warn(missing_docs, clippy::pedantic)]

use tracing_subscriber::EnvFilter;

/// Filter applied when `RUST_LOG` is unset or invalid.
pub const DEFAULT_FILTER: &str = "info";

/// Builds the filter from `RUST_LOG`, falling back to `default`.
#[must_use]
pub fn env_filter(default: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
}

/// Installs a compact fmt subscriber writing to stderr.
///
/// `verbose` raises the fallback level to `debug`. Returns `false` if a global
/// subscriber was already installed.
pub fn init_tracing(verbose: bool) -> bool {
    let default = if verbose { "debug" } else { DEFAULT_FILTER };

    tracing_subscriber::fmt()
        .with_env_filter(env_filter(default))
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
        .is_ok()
}
