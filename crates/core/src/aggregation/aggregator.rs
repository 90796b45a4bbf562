//! Aggregator task
//!
//! Sole consumer of the ingestion queue. Merges each event into the shared
//! [`MetricsTable`] under a single table-wide lock, which is also what the
//! flush path takes to snapshot the table.

use std::sync::{Arc, Mutex, MutexGuard};

use bucky_domain::{MetricEvent, MetricKey, MetricValue};
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument, warn};

use super::table::MetricsTable;
use crate::diagnostics_ports::DiagnosticSink;
use crate::ingest::EventReceiver;
use crate::stats::ClientStats;

/// Shared handle over the live table.
#[derive(Clone)]
pub struct Aggregator {
    table: Arc<Mutex<MetricsTable>>,
    sink: Arc<dyn DiagnosticSink>,
    stats: Arc<ClientStats>,
}

impl std::fmt::Debug for Aggregator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Aggregator").field("entries", &self.len()).finish_non_exhaustive()
    }
}

impl Aggregator {
    /// Empty table reporting conflicts to `sink`.
    pub fn new(sink: Arc<dyn DiagnosticSink>, stats: Arc<ClientStats>) -> Self {
        Self { table: Arc::new(Mutex::new(MetricsTable::new())), sink, stats }
    }

    /// Merge one event. A reducer kind conflict drops the event and is
    /// reported to the diagnostic sink.
    pub fn merge(&self, event: MetricEvent) {
        let outcome = self.lock().merge(event);
        match outcome {
            Ok(()) => self.stats.record_merged(),
            Err(err) => {
                self.stats.record_dropped();
                self.sink.report(&err);
            }
        }
    }

    /// Merge everything currently buffered in `receiver` without waiting.
    /// Returns the number of events taken off the queue.
    pub fn drain(&self, receiver: &mut EventReceiver) -> usize {
        let mut drained = 0;
        while let Some(event) = receiver.try_recv() {
            self.merge(event);
            drained += 1;
        }
        drained
    }

    /// Consume events until `shutdown` fires or every recorder is dropped.
    ///
    /// On shutdown the receiver is closed first, so nothing can be enqueued
    /// behind the final drain.
    #[instrument(name = "bucky.aggregator", skip_all)]
    pub async fn run(self, mut receiver: EventReceiver, shutdown: CancellationToken) {
        loop {
            tokio::select! {
                biased;
                () = shutdown.cancelled() => {
                    receiver.close();
                    let drained = self.drain(&mut receiver);
                    debug!(drained, "Aggregator drained queue on shutdown");
                    return;
                }
                event = receiver.recv() => match event {
                    Some(event) => self.merge(event),
                    None => {
                        debug!("All recorders dropped, aggregator exiting");
                        return;
                    }
                },
            }
        }
    }

    /// Discard every entry without sending it.
    pub fn reset(&self) {
        self.lock().reset();
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Current value stored for `key`, if any.
    pub fn value_of(&self, key: &MetricKey) -> Option<MetricValue> {
        self.lock().get(key).copied()
    }

    pub(crate) fn lock(&self) -> MutexGuard<'_, MetricsTable> {
        self.table.lock().unwrap_or_else(|poisoned| {
            warn!("Metrics table lock poisoned, recovering");
            poisoned.into_inner()
        })
    }
}
