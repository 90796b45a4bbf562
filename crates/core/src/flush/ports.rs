use async_trait::async_trait;
use bucky_domain::Result;

/// Delivery of a serialized payload to the collector.
///
/// Implementations return the HTTP status code of the response, or
/// `BuckyError::Transport` when no response was obtained. Classifying the
/// status is left to [`FlushService`](super::FlushService).
#[async_trait]
pub trait MetricsTransport: Send + Sync {
    async fn post(&self, body: &[u8]) -> Result<u16>;
}
