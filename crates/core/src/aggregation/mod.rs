//! Aggregation of metric events into the live metrics table

pub mod aggregator;
pub mod table;

pub use aggregator::Aggregator;
pub use table::MetricsTable;
