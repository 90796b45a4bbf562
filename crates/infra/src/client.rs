//! Client facade
//!
//! Wires the recorder, aggregator, flush service and scheduler together.
//!
//! ```no_run
//! use bucky_domain::ClientConfig;
//! use bucky_infra::BuckyClient;
//!
//! # async fn example() -> bucky_domain::Result<()> {
//! let client = BuckyClient::new(ClientConfig::new("http://localhost:8005/bucky/v1/send"))?;
//! client.count("requests", 1);
//! client.average_timer("render", 42);
//! client.stop().await.ok();
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;
use std::time::Duration;

use bucky_common::BufferPool;
use bucky_core::{
    event_queue, Aggregator, ClientStats, DiagnosticSink, FlushReport, FlushService,
    MetricsRecorder, MetricsTransport, StatsSnapshot, TracingSink,
};
use bucky_domain::constants::{DEFAULT_BUFFER_CAPACITY, DEFAULT_POOLED_BUFFERS};
use bucky_domain::{check_flush_interval, BuckyError, ClientConfig, Result};
use tokio_util::sync::CancellationToken;
use tracing::{info, instrument};

use crate::http::HttpTransport;
use crate::scheduling::{FlushScheduler, SchedulerResult, SchedulerState};

/// Metrics client: record from anywhere, flushed in the background.
pub struct BuckyClient {
    recorder: MetricsRecorder,
    aggregator: Aggregator,
    flusher: FlushService,
    scheduler: FlushScheduler,
    stats: Arc<ClientStats>,
}

impl BuckyClient {
    /// Client posting to `config.endpoint` over HTTP.
    ///
    /// Must be called inside a tokio runtime.
    ///
    /// # Errors
    /// Returns `BuckyError::Configuration` for an invalid endpoint or
    /// settings.
    pub fn new(config: ClientConfig) -> Result<Self> {
        Self::builder(config).build()
    }

    /// Builder for injecting a transport, sink or pool settings.
    pub fn builder(config: ClientConfig) -> BuckyClientBuilder {
        BuckyClientBuilder::new(config)
    }

    /// Increment a counter (`name:value|c`).
    pub fn count(&self, name: impl Into<String>, amount: i64) {
        self.recorder.count(name, amount);
    }

    /// Add to a summed timer (`name:value|ms`).
    pub fn timer(&self, name: impl Into<String>, amount: i64) {
        self.recorder.timer(name, amount);
    }

    /// Add a sample to an averaged timer (`name:value|ms`).
    pub fn average_timer(&self, name: impl Into<String>, amount: i64) {
        self.recorder.average_timer(name, amount);
    }

    /// Cloneable producer handle. Becomes a no-op once the client stops.
    pub fn recorder(&self) -> MetricsRecorder {
        self.recorder.clone()
    }

    /// Flush now instead of waiting for the next tick.
    ///
    /// Events still sitting in the queue are not included.
    ///
    /// # Errors
    /// `NoMetrics`, `Transport` or `RemoteRejected`; see
    /// [`FlushService::flush`].
    pub async fn flush(&self) -> Result<FlushReport> {
        self.flusher.flush().await
    }

    /// Discard all aggregated metrics without sending them.
    pub fn reset(&self) {
        self.aggregator.reset();
    }

    /// Current scheduler lifecycle state.
    pub fn state(&self) -> SchedulerState {
        self.scheduler.state()
    }

    /// Counters since construction.
    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }

    /// Drain queued events, send a final flush and stop the background
    /// tasks. Returns once the final flush has completed.
    ///
    /// # Errors
    /// Returns `SchedulerError` if a background task panicked.
    #[instrument(skip(self))]
    pub async fn stop(self) -> SchedulerResult<()> {
        self.scheduler.stop().await?;
        info!(stats = ?self.stats.snapshot(), "Bucky client stopped");
        Ok(())
    }
}

impl std::fmt::Debug for BuckyClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BuckyClient")
            .field("state", &self.state())
            .field("stats", &self.stats())
            .finish_non_exhaustive()
    }
}

/// Builder for [`BuckyClient`].
pub struct BuckyClientBuilder {
    config: ClientConfig,
    transport: Option<Arc<dyn MetricsTransport>>,
    sink: Option<Arc<dyn DiagnosticSink>>,
    flush_interval: Option<Duration>,
    pooled_buffers: usize,
    buffer_capacity: usize,
}

impl BuckyClientBuilder {
    fn new(config: ClientConfig) -> Self {
        Self {
            config,
            transport: None,
            sink: None,
            flush_interval: None,
            pooled_buffers: DEFAULT_POOLED_BUFFERS,
            buffer_capacity: DEFAULT_BUFFER_CAPACITY,
        }
    }

    /// Replace the HTTP transport.
    pub fn transport(mut self, transport: Arc<dyn MetricsTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Receive absorbed errors instead of logging them through `tracing`.
    pub fn diagnostic_sink(mut self, sink: Arc<dyn DiagnosticSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Override the configured flush interval. Still clamped to one minute
    /// and bounded by `MAX_FLUSH_INTERVAL`.
    pub fn flush_interval(mut self, interval: Duration) -> Self {
        self.flush_interval = Some(interval);
        self
    }

    /// Size the payload buffer pool.
    pub fn buffer_pool(mut self, retained: usize, buffer_capacity: usize) -> Self {
        self.pooled_buffers = retained;
        self.buffer_capacity = buffer_capacity;
        self
    }

    /// Validate the settings and spawn the background tasks.
    ///
    /// # Errors
    /// Returns `BuckyError::Configuration` for invalid settings.
    pub fn build(self) -> Result<BuckyClient> {
        self.config.validate()?;
        if tokio::runtime::Handle::try_current().is_err() {
            return Err(BuckyError::Configuration(
                "BuckyClient must be built inside a tokio runtime".into(),
            ));
        }

        let transport = match self.transport {
            Some(transport) => transport,
            None => Arc::new(HttpTransport::from_config(&self.config)?),
        };
        let sink: Arc<dyn DiagnosticSink> = match self.sink {
            Some(sink) => sink,
            None => Arc::new(TracingSink),
        };
        let interval = match self.flush_interval {
            Some(interval) => check_flush_interval(interval)?,
            None => self.config.flush_interval(),
        };

        let stats = Arc::new(ClientStats::new());
        let aggregator = Aggregator::new(Arc::clone(&sink), Arc::clone(&stats));
        let pool = Arc::new(BufferPool::new(self.pooled_buffers, self.buffer_capacity));
        let flusher =
            FlushService::new(aggregator.clone(), pool, transport, Arc::clone(&stats));

        let (recorder, receiver) = event_queue(Arc::clone(&stats));
        let shutdown = CancellationToken::new();
        let aggregator_handle = tokio::spawn(aggregator.clone().run(receiver, shutdown.clone()));
        let scheduler =
            FlushScheduler::spawn(interval, flusher.clone(), sink, shutdown, aggregator_handle);

        info!(endpoint = %self.config.endpoint, "Bucky client started");
        Ok(BuckyClient { recorder, aggregator, flusher, scheduler, stats })
    }
}
