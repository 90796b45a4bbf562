//! Error types used throughout the client

use thiserror::Error;

use crate::types::ReducerKind;

/// Main error type for the bucky client
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BuckyError {
    /// The client could not be constructed from the supplied settings.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A flush was attempted while the metrics table was empty.
    #[error("No metrics to flush")]
    NoMetrics,

    /// The payload could not be delivered to the collector.
    #[error("Transport error: {0}")]
    Transport(String),

    /// The collector answered with a non-success status code.
    #[error("Non-success HTTP status code ({status})")]
    RemoteRejected {
        /// HTTP status returned by the collector
        status: u16,
    },

    /// A producer mixed reducer kinds for the same metric key.
    #[error(
        "Reducer kind conflict for {name}|{unit}: aggregated as {existing}, event used {attempted}"
    )]
    ReducerKindConflict {
        /// Metric name
        name: String,
        /// Metric unit
        unit: String,
        /// Kind the key was first aggregated under
        existing: ReducerKind,
        /// Kind carried by the rejected event
        attempted: ReducerKind,
    },
}

impl BuckyError {
    /// Whether the error only means there was nothing to do.
    pub fn is_no_metrics(&self) -> bool {
        matches!(self, Self::NoMetrics)
    }
}

/// Result type alias for bucky operations
pub type Result<T> = std::result::Result<T, BuckyError>;
