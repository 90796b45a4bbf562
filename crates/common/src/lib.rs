//! Modular common utilities shared across bucky crates.
//!
//! # Feature Tiers
//!
//! Enable cargo features to opt into the tiers you need:
//! - `foundation`: collections (reusable serialization buffers)
//! - `observability`: tracing subscriber initialisation

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms)]
#![warn(clippy::all, clippy::perf, clippy::complexity, clippy::suspicious)]

// Foundation tier
// -----------------------------------------------------------------
#[cfg(feature = "foundation")]
pub mod collections;

// Observability tier
// --------------------------------------------------------------
#[cfg(feature = "observability")]
pub mod observability;

// Re-export commonly used types for convenience
// ------------------------
#[cfg(feature = "foundation")]
pub use collections::{BufferPool, BufferPoolStats};
