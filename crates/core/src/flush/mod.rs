//! Flush path: serialize the table, clear it, ship the payload

pub mod ports;
pub mod serialize;
pub mod service;

pub use ports::MetricsTransport;
pub use serialize::{render, write_table};
pub use service::{FlushReport, FlushService};
