//! Periodic flushing and the stop lifecycle
//!
//! - Explicit lifecycle management (spawn on construction, stop once)
//! - Join handles for spawned tasks
//! - Cancellation token support
//! - State published through a watch channel

pub mod error;
pub mod flush_scheduler;

pub use error::{SchedulerError, SchedulerResult};
pub use flush_scheduler::{FlushScheduler, SchedulerState};
