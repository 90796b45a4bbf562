//! # Bucky Domain
//!
//! Domain types and models for the bucky metrics client.
//!
//! This crate contains:
//! - Metric identity and mergeable value types
//! - Domain error types and Result definitions
//! - Client configuration structures
//! - Wire and scheduling constants
//!
//! ## Architecture
//! - No dependencies on other bucky crates
//! - Only external dependencies allowed
//! - Pure domain models and data structures

pub mod config;
pub mod constants;
pub mod errors;
pub mod macros;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
