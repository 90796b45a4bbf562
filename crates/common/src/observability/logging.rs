//! Tracing subscriber initialisation
//!
//! Diagnostics go to standard error by default. The filter comes from
//! `RUST_LOG` when set, otherwise [`DEFAULT_FILTER`].

use thiserror::Error;
use tracing_subscriber::fmt;
use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is unset or invalid
pub const DEFAULT_FILTER: &str = "info";

/// Subscriber installation failure
#[derive(Debug, Error)]
#[error("failed to install tracing subscriber: {0}")]
pub struct LoggingError(String);

/// Install the global stderr subscriber using `RUST_LOG`.
///
/// # Errors
/// Returns `LoggingError` if a global subscriber is already installed.
pub fn init() -> Result<(), LoggingError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    install(filter)
}

/// Install the global stderr subscriber with an explicit filter directive.
///
/// # Errors
/// Returns `LoggingError` if the directive is invalid or a global subscriber
/// is already installed.
pub fn init_with_filter(directive: &str) -> Result<(), LoggingError> {
    let filter = EnvFilter::try_new(directive).map_err(|e| LoggingError(e.to_string()))?;
    install(filter)
}

fn install(filter: EnvFilter) -> Result<(), LoggingError> {
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .try_init()
        .map_err(|e| LoggingError(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_directive_is_reported() {
        let err = init_with_filter("bucky=notalevel").unwrap_err();
        assert!(err.to_string().contains("failed to install tracing subscriber"));
    }

    #[test]
    fn second_install_fails() {
        // Whichever call wins the race installs the subscriber; the other must fail.
        let first = init_with_filter("debug");
        let second = init_with_filter("debug");
        assert!(first.is_err() || second.is_err());
    }
}
