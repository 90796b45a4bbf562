//! # Bucky Core
//!
//! Aggregation engine of the bucky metrics client, free of HTTP and runtime
//! wiring.
//!
//! - [`ingest`]: the producer API and its fire-and-forget queue
//! - [`aggregation`]: the live table and the task that merges into it
//! - [`flush`]: serialization and the transport port
//!
//! The HTTP transport, scheduler and client facade live in `bucky-infra`.

pub mod aggregation;
pub mod diagnostics_ports;
pub mod flush;
pub mod ingest;
pub mod stats;

#[cfg(any(test, feature = "test-utils"))]
pub mod testing;

pub use aggregation::{Aggregator, MetricsTable};
pub use diagnostics_ports::{DiagnosticSink, TracingSink};
pub use flush::{render, write_table, FlushReport, FlushService, MetricsTransport};
pub use ingest::{event_queue, EventReceiver, MetricsRecorder};
pub use stats::{ClientStats, StatsSnapshot};
