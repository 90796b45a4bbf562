//! Client self-statistics
//!
//! Lock-free counters describing what the engine did with the events it was
//! given. Steady-state errors are absorbed by the client, so these counters
//! (together with the diagnostic sink) are the only way to observe them.

use std::sync::atomic::{AtomicU64, Ordering};

/// Counters shared by the recorder, the aggregator and the flush service.
#[derive(Debug, Default)]
pub struct ClientStats {
    events_recorded: AtomicU64,
    events_merged: AtomicU64,
    events_dropped: AtomicU64,
    flushes_succeeded: AtomicU64,
    flushes_failed: AtomicU64,
    flushes_empty: AtomicU64,
}

/// Point-in-time copy of [`ClientStats`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatsSnapshot {
    /// Events accepted by the ingestion queue
    pub events_recorded: u64,
    /// Events folded into the table
    pub events_merged: u64,
    /// Events rejected because of a reducer kind conflict
    pub events_dropped: u64,
    /// Payloads accepted by the collector
    pub flushes_succeeded: u64,
    /// Payloads lost to transport failures or rejections
    pub flushes_failed: u64,
    /// Flushes skipped because the table was empty
    pub flushes_empty: u64,
}

impl ClientStats {
    /// All counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// An event was published to the queue.
    pub fn record_event(&self) {
        self.events_recorded.fetch_add(1, Ordering::Relaxed);
    }

    /// An event was folded into the table.
    pub fn record_merged(&self) {
        self.events_merged.fetch_add(1, Ordering::Relaxed);
    }

    /// An event was discarded on a reducer kind conflict.
    pub fn record_dropped(&self) {
        self.events_dropped.fetch_add(1, Ordering::Relaxed);
    }

    /// The collector answered with a 2xx status.
    pub fn record_flush_succeeded(&self) {
        self.flushes_succeeded.fetch_add(1, Ordering::Relaxed);
    }

    /// A payload was lost to a transport error or a rejection.
    pub fn record_flush_failed(&self) {
        self.flushes_failed.fetch_add(1, Ordering::Relaxed);
    }

    /// A flush found nothing to send.
    pub fn record_flush_empty(&self) {
        self.flushes_empty.fetch_add(1, Ordering::Relaxed);
    }

    /// Point-in-time copy of every counter.
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            events_recorded: self.events_recorded.load(Ordering::Relaxed),
            events_merged: self.events_merged.load(Ordering::Relaxed),
            events_dropped: self.events_dropped.load(Ordering::Relaxed),
            flushes_succeeded: self.flushes_succeeded.load(Ordering::Relaxed),
            flushes_failed: self.flushes_failed.load(Ordering::Relaxed),
            flushes_empty: self.flushes_empty.load(Ordering::Relaxed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_reflects_each_counter() {
        let stats = ClientStats::new();
        stats.record_event();
        stats.record_event();
        stats.record_merged();
        stats.record_dropped();
        stats.record_flush_succeeded();
        stats.record_flush_failed();
        stats.record_flush_empty();

        let snapshot = stats.snapshot();
        assert_eq!(snapshot.events_recorded, 2);
        assert_eq!(snapshot.events_merged, 1);
        assert_eq!(snapshot.events_dropped, 1);
        assert_eq!(snapshot.flushes_succeeded, 1);
        assert_eq!(snapshot.flushes_failed, 1);
        assert_eq!(snapshot.flushes_empty, 1);
    }
}
