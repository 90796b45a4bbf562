//! Flush service
//!
//! Snapshots and clears the table under the aggregator's lock, then posts the
//! payload with the lock released. Cleared metrics are never restored, even
//! when delivery fails.

use std::sync::Arc;

use bucky_common::BufferPool;
use bucky_domain::{BuckyError, Result};
use tracing::{debug, instrument};

use super::ports::MetricsTransport;
use super::serialize::write_table;
use crate::aggregation::Aggregator;
use crate::stats::ClientStats;

/// Outcome of a delivered flush.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlushReport {
    /// Table entries included in the payload
    pub entries: usize,
    /// Payload size in bytes
    pub bytes: usize,
}

/// Serialize, clear and ship.
#[derive(Clone)]
pub struct FlushService {
    aggregator: Aggregator,
    pool: Arc<BufferPool>,
    transport: Arc<dyn MetricsTransport>,
    stats: Arc<ClientStats>,
}

impl FlushService {
    pub fn new(
        aggregator: Aggregator,
        pool: Arc<BufferPool>,
        transport: Arc<dyn MetricsTransport>,
        stats: Arc<ClientStats>,
    ) -> Self {
        Self { aggregator, pool, transport, stats }
    }

    /// Flush the current table.
    ///
    /// # Errors
    /// - `NoMetrics` when the table is empty; no request is made.
    /// - `Transport` when the collector could not be reached.
    /// - `RemoteRejected` when the collector answered outside 200..=299.
    ///
    /// The table is empty afterwards in every case.
    #[instrument(name = "bucky.flush", skip_all)]
    pub async fn flush(&self) -> Result<FlushReport> {
        let mut buf = self.pool.acquire();
        let entries = {
            let mut table = self.aggregator.lock();
            if table.is_empty() {
                drop(table);
                self.pool.release(buf);
                self.stats.record_flush_empty();
                return Err(BuckyError::NoMetrics);
            }
            write_table(&table, &mut buf);
            table.take().len()
        };

        let bytes = buf.len();
        let outcome = self.transport.post(&buf).await;
        self.pool.release(buf);

        let result = match outcome {
            Ok(status) if (200..=299).contains(&status) => {
                debug!(entries, bytes, status, "Flushed metrics");
                Ok(FlushReport { entries, bytes })
            }
            Ok(status) => Err(BuckyError::RemoteRejected { status }),
            Err(err) => Err(err),
        };
        match &result {
            Ok(_) => self.stats.record_flush_succeeded(),
            Err(_) => self.stats.record_flush_failed(),
        }
        result
    }
}

impl std::fmt::Debug for FlushService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FlushService")
            .field("aggregator", &self.aggregator)
            .field("pool", &self.pool.stats())
            .finish_non_exhaustive()
    }
}
