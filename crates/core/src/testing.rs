//! In-memory doubles for the client's ports
//!
//! Enabled for this crate's own tests and for downstream crates through the
//! `test-utils` feature.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bucky_domain::{BuckyError, Result};

use crate::diagnostics_ports::DiagnosticSink;
use crate::flush::MetricsTransport;

/// Sink that keeps every reported error.
#[derive(Debug, Default)]
pub struct RecordingSink {
    reported: Mutex<Vec<BuckyError>>,
}

impl RecordingSink {
    pub fn reported(&self) -> Vec<BuckyError> {
        self.reported.lock().unwrap_or_else(|poisoned| poisoned.into_inner()).clone()
    }
}

impl DiagnosticSink for RecordingSink {
    fn report(&self, error: &BuckyError) {
        self.reported.lock().unwrap_or_else(|poisoned| poisoned.into_inner()).push(error.clone());
    }
}

#[derive(Debug, Clone)]
enum Reply {
    Status(u16),
    Fail(String),
}

/// Transport that records payloads and answers with a fixed reply.
#[derive(Debug, Clone)]
pub struct MockTransport {
    reply: Reply,
    bodies: Arc<Mutex<Vec<String>>>,
}

impl MockTransport {
    /// Answer every post with `status`.
    pub fn with_status(status: u16) -> Self {
        Self { reply: Reply::Status(status), bodies: Arc::default() }
    }

    /// Fail every post with `BuckyError::Transport(message)`.
    pub fn failing(message: impl Into<String>) -> Self {
        Self { reply: Reply::Fail(message.into()), bodies: Arc::default() }
    }

    /// Payloads received so far, in order.
    pub fn bodies(&self) -> Vec<String> {
        self.bodies.lock().unwrap_or_else(|poisoned| poisoned.into_inner()).clone()
    }

    pub fn calls(&self) -> usize {
        self.bodies.lock().unwrap_or_else(|poisoned| poisoned.into_inner()).len()
    }
}

#[async_trait]
impl MetricsTransport for MockTransport {
    async fn post(&self, body: &[u8]) -> Result<u16> {
        self.bodies
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(String::from_utf8_lossy(body).into_owned());
        match &self.reply {
            Reply::Status(status) => Ok(*status),
            Reply::Fail(message) => Err(BuckyError::Transport(message.clone())),
        }
    }
}
