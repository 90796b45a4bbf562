//! Event ingestion: the producer API and its hand-off queue

pub mod queue;

pub use queue::{event_queue, EventReceiver, MetricsRecorder};
