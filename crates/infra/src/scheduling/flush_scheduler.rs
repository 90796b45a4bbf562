//! Interval flush scheduler.
//!
//! Owns the background loop that flushes the table once per interval and
//! carries out the stop sequence:
//!
//! ```text
//! Running --stop--> Draining --(aggregator drained, final flush)--> Stopped
//! ```
//!
//! Ticks start one full interval after construction. A stop signal always
//! wins over a tick that is ready at the same time.

use std::sync::Arc;
use std::time::Duration;

use bucky_core::{DiagnosticSink, FlushService};
use bucky_domain::clamp_flush_interval;
use bucky_domain::constants::MAX_FLUSH_INTERVAL;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

use crate::scheduling::error::SchedulerResult;

/// Lifecycle of the flush loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    /// Flushing on every tick
    Running,
    /// Stop requested; queue drain and final flush in progress
    Draining,
    /// Final flush done; the loop has exited
    Stopped,
}

bucky_domain::impl_domain_status_conversions!(SchedulerState {
    Running => "running",
    Draining => "draining",
    Stopped => "stopped",
});

/// Aggregator task the scheduler shuts down before its final flush.
struct AggregatorTask {
    shutdown: CancellationToken,
    handle: JoinHandle<()>,
}

/// Background flush loop with explicit lifecycle management.
pub struct FlushScheduler {
    state: watch::Receiver<SchedulerState>,
    cancellation: CancellationToken,
    handle: Option<JoinHandle<()>>,
    interval: Duration,
}

impl FlushScheduler {
    /// Spawn the flush loop. Must be called inside a tokio runtime.
    ///
    /// `interval` is raised to the one-minute floor when shorter and capped
    /// at `MAX_FLUSH_INTERVAL`.
    /// `aggregator_shutdown` and `aggregator_handle` belong to the task
    /// consuming the event queue; the loop cancels and awaits it on stop.
    pub fn spawn(
        interval: Duration,
        flusher: FlushService,
        sink: Arc<dyn DiagnosticSink>,
        aggregator_shutdown: CancellationToken,
        aggregator_handle: JoinHandle<()>,
    ) -> Self {
        let interval = clamp_flush_interval(interval).min(MAX_FLUSH_INTERVAL);
        let (state_tx, state_rx) = watch::channel(SchedulerState::Running);
        let cancellation = CancellationToken::new();
        let aggregator = AggregatorTask { shutdown: aggregator_shutdown, handle: aggregator_handle };

        let handle = tokio::spawn(Self::flush_loop(
            interval,
            flusher,
            sink,
            aggregator,
            state_tx,
            cancellation.clone(),
        ));

        info!(interval_secs = interval.as_secs(), "Flush scheduler started");
        Self { state: state_rx, cancellation, handle: Some(handle), interval }
    }

    /// Latest published state.
    pub fn state(&self) -> SchedulerState {
        *self.state.borrow()
    }

    /// Receiver that observes every state transition.
    pub fn subscribe(&self) -> watch::Receiver<SchedulerState> {
        self.state.clone()
    }

    /// Effective interval after clamping.
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Request shutdown and wait for the final flush to finish.
    ///
    /// No timeout is applied; wrap the call in `tokio::time::timeout` to
    /// bound it.
    ///
    /// # Errors
    /// Returns `SchedulerError` if the loop task panicked or was aborted.
    #[instrument(skip(self))]
    pub async fn stop(mut self) -> SchedulerResult<()> {
        info!("Stopping flush scheduler");
        self.cancellation.cancel();

        if let Some(handle) = self.handle.take() {
            handle.await?;
        }

        info!("Flush scheduler stopped");
        Ok(())
    }

    async fn flush_loop(
        period: Duration,
        flusher: FlushService,
        sink: Arc<dyn DiagnosticSink>,
        aggregator: AggregatorTask,
        state: watch::Sender<SchedulerState>,
        cancel: CancellationToken,
    ) {
        let mut ticker = interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;
                () = cancel.cancelled() => {
                    debug!("Flush loop cancelled");
                    break;
                }
                _ = ticker.tick() => {
                    Self::flush_once(&flusher, sink.as_ref()).await;
                }
            }
        }

        state.send_replace(SchedulerState::Draining);

        aggregator.shutdown.cancel();
        if let Err(err) = aggregator.handle.await {
            warn!(error = %err, "Aggregator task did not exit cleanly");
        }

        Self::flush_once(&flusher, sink.as_ref()).await;
        state.send_replace(SchedulerState::Stopped);
    }

    async fn flush_once(flusher: &FlushService, sink: &dyn DiagnosticSink) {
        match flusher.flush().await {
            Ok(report) => {
                debug!(entries = report.entries, bytes = report.bytes, "Scheduled flush delivered");
            }
            Err(err) if err.is_no_metrics() => debug!("No metrics to flush"),
            Err(err) => sink.report(&err),
        }
    }
}

impl Drop for FlushScheduler {
    fn drop(&mut self) {
        if self.handle.as_ref().is_some_and(|handle| !handle.is_finished()) {
            warn!("FlushScheduler dropped while running; cancelling flush loop");
            self.cancellation.cancel();
        }
    }
}
