//! Observability primitives
//!
//! Logging setup lives here so that binaries and tests share one subscriber
//! configuration. Library code only ever emits `tracing` events.

pub mod logging;

pub use logging::{init, init_with_filter, LoggingError};
