//! Client configuration structures

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_REQUEST_TIMEOUT_SECS, DEFAULT_USER_AGENT, MAX_FLUSH_INTERVAL, MAX_FLUSH_INTERVAL_SECS,
    MIN_FLUSH_INTERVAL, MIN_FLUSH_INTERVAL_SECS,
};
use crate::errors::{BuckyError, Result};

/// Settings needed to build a client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Full URL of the collector endpoint
    pub endpoint: String,

    /// Seconds between flushes; raised to the one-minute floor when lower
    #[serde(default = "default_flush_interval_secs")]
    pub flush_interval_secs: u64,

    /// Per-request timeout for the HTTP transport
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// User agent sent with every flush
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_flush_interval_secs() -> u64 {
    MIN_FLUSH_INTERVAL_SECS
}

fn default_request_timeout_secs() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECS
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

impl ClientConfig {
    /// Config for `endpoint` with every other field at its default.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            flush_interval_secs: default_flush_interval_secs(),
            request_timeout_secs: default_request_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }

    /// Replace the flush interval, in seconds.
    pub fn with_flush_interval_secs(mut self, secs: u64) -> Self {
        self.flush_interval_secs = secs;
        self
    }

    /// Effective flush interval after applying the floor.
    pub fn flush_interval(&self) -> Duration {
        clamp_flush_interval(Duration::from_secs(self.flush_interval_secs))
    }

    /// Per-request timeout for the HTTP transport.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Reject settings the client cannot start with.
    ///
    /// # Errors
    /// Returns `BuckyError::Configuration` for an empty endpoint, a flush
    /// interval above [`MAX_FLUSH_INTERVAL`], or a zero request timeout.
    pub fn validate(&self) -> Result<()> {
        if self.endpoint.trim().is_empty() {
            return Err(BuckyError::Configuration("endpoint must not be empty".into()));
        }
        check_flush_interval(Duration::from_secs(self.flush_interval_secs))?;
        if self.request_timeout_secs == 0 {
            return Err(BuckyError::Configuration("request timeout must be positive".into()));
        }
        Ok(())
    }
}

/// Raise `interval` to [`MIN_FLUSH_INTERVAL`] when it is shorter.
pub fn clamp_flush_interval(interval: Duration) -> Duration {
    interval.max(MIN_FLUSH_INTERVAL)
}

/// Clamp `interval` to the floor and reject it above [`MAX_FLUSH_INTERVAL`].
///
/// # Errors
/// Returns `BuckyError::Configuration` when the interval is too long to
/// schedule.
pub fn check_flush_interval(interval: Duration) -> Result<Duration> {
    if interval > MAX_FLUSH_INTERVAL {
        return Err(BuckyError::Configuration(format!(
            "flush interval of {}s exceeds the maximum of {MAX_FLUSH_INTERVAL_SECS}s",
            interval.as_secs()
        )));
    }
    Ok(clamp_flush_interval(interval))
}
