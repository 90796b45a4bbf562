//! Diagnostic sink port
//!
//! Every steady-state error the client absorbs (transport failures, collector
//! rejections, reducer kind conflicts) is handed to a [`DiagnosticSink`].
//! The default [`TracingSink`] turns them into `tracing` events; callers can
//! substitute their own sink at construction time.

use bucky_domain::BuckyError;
use tracing::{debug, error, warn};

/// Receiver of absorbed client errors.
///
/// Implementations must be cheap and must not block: `report` is called on
/// the aggregation and flush paths.
pub trait DiagnosticSink: Send + Sync {
    /// Report an error that was absorbed instead of returned.
    fn report(&self, error: &BuckyError);
}

/// Default sink that logs through `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn report(&self, err: &BuckyError) {
        match err {
            BuckyError::NoMetrics => debug!("No metrics to flush"),
            BuckyError::ReducerKindConflict { name, unit, existing, attempted } => warn!(
                metric = %name,
                unit = %unit,
                %existing,
                %attempted,
                "Dropped metric event: reducer kind conflict"
            ),
            BuckyError::RemoteRejected { status } => {
                error!(status, "Collector rejected metrics payload");
            }
            BuckyError::Transport(message) => {
                error!(error = %message, "Failed to send metrics payload");
            }
            BuckyError::Configuration(message) => {
                error!(error = %message, "Client configuration error");
            }
        }
    }
}
