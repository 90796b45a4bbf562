//! # Bucky Infrastructure
//!
//! Runtime wiring for the bucky metrics client.
//!
//! This crate contains:
//! - The reqwest transport implementing `bucky_core::MetricsTransport`
//! - The interval flush scheduler and its stop lifecycle
//! - Configuration loading from environment and files
//! - The [`BuckyClient`] facade
//!
//! ## Architecture
//! - Implements traits defined in `bucky-core`
//! - Contains all "impure" code (HTTP, timers, environment)

pub mod client;
pub mod config;
pub mod errors;
pub mod http;
pub mod scheduling;

// Re-export commonly used items
pub use bucky_common::observability::init as init_logging;
pub use client::{BuckyClient, BuckyClientBuilder};
pub use errors::InfraError;
pub use http::{HttpTransport, HttpTransportBuilder};
pub use scheduling::{FlushScheduler, SchedulerError, SchedulerResult, SchedulerState};
