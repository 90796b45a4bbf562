//! HTTP delivery of metrics payloads

pub mod client;

pub use client::{HttpTransport, HttpTransportBuilder};
