//! Fire-and-forget hand-off from producer calls to the aggregator.
//!
//! Backed by an unbounded tokio mpsc channel: publishing never blocks and
//! never awaits, so `count`/`timer`/`average_timer` can be called from sync
//! and async code alike. Events from one producer arrive in call order.
//!
//! Once the aggregator has shut down the receiver is closed and further
//! publications are dropped with a debug log.

use std::sync::Arc;

use bucky_domain::MetricEvent;
use tokio::sync::mpsc::{self, error::TryRecvError};
use tracing::debug;

use crate::stats::ClientStats;

/// Create a connected recorder/receiver pair.
pub fn event_queue(stats: Arc<ClientStats>) -> (MetricsRecorder, EventReceiver) {
    let (tx, rx) = mpsc::unbounded_channel();
    (MetricsRecorder { tx, stats }, EventReceiver { rx })
}

/// Cloneable producer handle.
#[derive(Debug, Clone)]
pub struct MetricsRecorder {
    tx: mpsc::UnboundedSender<MetricEvent>,
    stats: Arc<ClientStats>,
}

impl MetricsRecorder {
    /// Increment a counter (`name:value|c`).
    pub fn count(&self, name: impl Into<String>, amount: i64) {
        self.record(MetricEvent::count(name, amount));
    }

    /// Add to a summed timer (`name:value|ms`).
    pub fn timer(&self, name: impl Into<String>, amount: i64) {
        self.record(MetricEvent::timer(name, amount));
    }

    /// Add a sample to an averaged timer (`name:value|ms`).
    pub fn average_timer(&self, name: impl Into<String>, amount: i64) {
        self.record(MetricEvent::average_timer(name, amount));
    }

    /// Publish a prebuilt event.
    pub fn record(&self, event: MetricEvent) {
        match self.tx.send(event) {
            Ok(()) => self.stats.record_event(),
            Err(mpsc::error::SendError(event)) => {
                debug!(metric = %event.key.name(), "Client stopped, dropping metric event");
            }
        }
    }

    /// Whether the aggregator has gone away.
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

/// Single-consumer end of the queue.
#[derive(Debug)]
pub struct EventReceiver {
    rx: mpsc::UnboundedReceiver<MetricEvent>,
}

impl EventReceiver {
    /// Wait for the next event. `None` once every recorder is gone, or after
    /// [`close`](Self::close) once the buffer is empty.
    pub async fn recv(&mut self) -> Option<MetricEvent> {
        self.rx.recv().await
    }

    /// Take the next buffered event without waiting.
    pub fn try_recv(&mut self) -> Option<MetricEvent> {
        match self.rx.try_recv() {
            Ok(event) => Some(event),
            Err(TryRecvError::Empty | TryRecvError::Disconnected) => None,
        }
    }

    /// Refuse further events. Already buffered events stay readable.
    pub fn close(&mut self) {
        self.rx.close();
    }

    pub fn len(&self) -> usize {
        self.rx.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rx.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use bucky_domain::ReducerKind;

    use super::*;

    #[test]
    fn producer_calls_enqueue_one_event_each() {
        let stats = Arc::new(ClientStats::new());
        let (recorder, mut receiver) = event_queue(Arc::clone(&stats));

        recorder.count("hits", 1);
        recorder.timer("render", 20);
        recorder.average_timer("render", 30);

        let first = receiver.try_recv().unwrap();
        assert_eq!(first, MetricEvent::count("hits", 1));
        let second = receiver.try_recv().unwrap();
        assert_eq!(second.kind, ReducerKind::Sum);
        let third = receiver.try_recv().unwrap();
        assert_eq!(third.kind, ReducerKind::Average);
        assert!(receiver.try_recv().is_none());
        assert_eq!(stats.snapshot().events_recorded, 3);
    }

    #[test]
    fn single_producer_order_is_preserved() {
        let (recorder, mut receiver) = event_queue(Arc::new(ClientStats::new()));
        for amount in 0..50 {
            recorder.count("seq", amount);
        }
        let amounts: Vec<i64> = std::iter::from_fn(|| receiver.try_recv()).map(|e| e.amount).collect();
        assert_eq!(amounts, (0..50).collect::<Vec<_>>());
    }

    #[test]
    fn closed_receiver_drops_new_events_but_keeps_buffered_ones() {
        let stats = Arc::new(ClientStats::new());
        let (recorder, mut receiver) = event_queue(Arc::clone(&stats));
        recorder.count("before", 1);
        receiver.close();
        recorder.count("after", 1);

        assert!(recorder.is_closed());
        assert_eq!(receiver.try_recv(), Some(MetricEvent::count("before", 1)));
        assert_eq!(receiver.try_recv(), None);
        assert_eq!(stats.snapshot().events_recorded, 1);
    }

    #[test]
    fn recording_after_receiver_dropped_is_a_no_op() {
        let (recorder, receiver) = event_queue(Arc::new(ClientStats::new()));
        drop(receiver);
        recorder.count("late", 1);
        assert!(recorder.is_closed());
    }
}
