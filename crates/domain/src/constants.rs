//! Client constants
//!
//! Centralized location for wire-format and scheduling constants.

use std::time::Duration;

/// Unit of counters
pub const UNIT_COUNTER: &str = "c";
/// Unit of timers, summed or averaged
pub const UNIT_TIMER: &str = "ms";

// Never ship more often than once per minute
/// Shortest flush interval, in seconds
pub const MIN_FLUSH_INTERVAL_SECS: u64 = 60;
/// Shortest flush interval
pub const MIN_FLUSH_INTERVAL: Duration = Duration::from_secs(MIN_FLUSH_INTERVAL_SECS);
/// Longest accepted flush interval, in seconds (365 days)
pub const MAX_FLUSH_INTERVAL_SECS: u64 = 365 * 24 * 60 * 60;
/// Longest accepted flush interval
pub const MAX_FLUSH_INTERVAL: Duration = Duration::from_secs(MAX_FLUSH_INTERVAL_SECS);

/// Per-request timeout when none is configured, in seconds
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
/// User agent when none is configured
pub const DEFAULT_USER_AGENT: &str = concat!("bucky-client/", env!("CARGO_PKG_VERSION"));
/// Content type of every payload
pub const PAYLOAD_CONTENT_TYPE: &str = "text/plain";

/// Buffers retained by the default pool
pub const DEFAULT_POOLED_BUFFERS: usize = 4;
/// Nominal capacity of a pooled buffer, in bytes
pub const DEFAULT_BUFFER_CAPACITY: usize = 4096;
