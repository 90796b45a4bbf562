use std::time::Duration;

use async_trait::async_trait;
use bucky_core::MetricsTransport;
use bucky_domain::constants::{DEFAULT_REQUEST_TIMEOUT_SECS, PAYLOAD_CONTENT_TYPE};
use bucky_domain::{BuckyError, ClientConfig, Result};
use reqwest::header::CONTENT_TYPE;
use reqwest::Client as ReqwestClient;
use tracing::debug;
use url::Url;

use crate::errors::InfraError;

/// Posts payloads to a single collector endpoint.
///
/// Each flush is one attempt. A failed delivery is reported and the payload
/// is dropped; there are no retries.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: ReqwestClient,
    endpoint: Url,
}

impl HttpTransport {
    /// Start building a transport for `endpoint`.
    pub fn builder(endpoint: impl Into<String>) -> HttpTransportBuilder {
        HttpTransportBuilder::new(endpoint)
    }

    /// Transport configured from the client settings.
    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        Self::builder(config.endpoint.clone())
            .timeout(config.request_timeout())
            .user_agent(config.user_agent.clone())
            .build()
    }

    /// Parsed collector URL.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl MetricsTransport for HttpTransport {
    async fn post(&self, body: &[u8]) -> Result<u16> {
        debug!(url = %self.endpoint, bytes = body.len(), "sending metrics payload");

        let response = self
            .client
            .post(self.endpoint.clone())
            .header(CONTENT_TYPE, PAYLOAD_CONTENT_TYPE)
            // reqwest needs an owned body; the pooled buffer stays with the flush service.
            .body(body.to_vec())
            .send()
            .await
            .map_err(|err| BuckyError::from(InfraError::from(err)))?;

        let status = response.status();
        debug!(url = %self.endpoint, %status, "received collector response");
        Ok(status.as_u16())
    }
}

/// Builder for [`HttpTransport`].
#[derive(Debug)]
pub struct HttpTransportBuilder {
    endpoint: String,
    timeout: Duration,
    user_agent: Option<String>,
    no_proxy: bool,
}

impl HttpTransportBuilder {
    fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            user_agent: None,
            no_proxy: false,
        }
    }

    /// Per-request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// `User-Agent` header sent with every request.
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    /// Connect directly, ignoring `HTTP_PROXY` / `HTTPS_PROXY`.
    pub fn no_proxy(mut self) -> Self {
        self.no_proxy = true;
        self
    }

    /// # Errors
    /// Returns `BuckyError::Configuration` when the endpoint is not an
    /// absolute `http`/`https` URL or the client cannot be built.
    pub fn build(self) -> Result<HttpTransport> {
        let endpoint = parse_endpoint(&self.endpoint)?;

        let mut builder = ReqwestClient::builder().timeout(self.timeout);

        if let Some(agent) = self.user_agent {
            builder = builder.user_agent(agent);
        }

        if self.no_proxy {
            builder = builder.no_proxy();
        }

        let client = builder.build().map_err(|err| BuckyError::from(InfraError::from(err)))?;

        Ok(HttpTransport { client, endpoint })
    }
}

fn parse_endpoint(raw: &str) -> Result<Url> {
    let url = Url::parse(raw.trim()).map_err(|err| BuckyError::from(InfraError::from(err)))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(BuckyError::Configuration(format!(
            "unsupported endpoint scheme '{other}', expected http or https"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use wiremock::matchers::{body_string, header, method};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    #[tokio::test]
    async fn posts_plain_text_body_and_returns_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(header("content-type", "text/plain"))
            .and(header("user-agent", "bucky-test/1.0"))
            .and(body_string("hits:3|c\n"))
            .respond_with(ResponseTemplate::new(202))
            .expect(1)
            .mount(&server)
            .await;

        let transport = HttpTransport::builder(server.uri())
            .user_agent("bucky-test/1.0")
            .no_proxy()
            .build()
            .unwrap();
        let status = transport.post(b"hits:3|c\n").await.unwrap();
        assert_eq!(status, 202);
    }

    #[tokio::test]
    async fn error_statuses_are_returned_not_raised() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let transport = HttpTransport::builder(server.uri()).no_proxy().build().unwrap();
        assert_eq!(transport.post(b"x:1|c\n").await.unwrap(), 500);
    }

    #[tokio::test]
    async fn slow_collector_times_out_as_transport_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(5)))
            .mount(&server)
            .await;

        let transport = HttpTransport::builder(server.uri())
            .timeout(Duration::from_millis(100))
            .no_proxy()
            .build()
            .unwrap();
        let err = transport.post(b"x:1|c\n").await.unwrap_err();
        assert!(matches!(err, BuckyError::Transport(_)), "got {err:?}");
    }

    #[test]
    fn rejects_relative_and_non_http_endpoints() {
        assert!(matches!(
            HttpTransport::builder("localhost").build(),
            Err(BuckyError::Configuration(_))
        ));
        assert!(matches!(
            HttpTransport::builder("ftp://collector/metrics").build(),
            Err(BuckyError::Configuration(_))
        ));
        assert!(matches!(HttpTransport::builder("").build(), Err(BuckyError::Configuration(_))));
    }

    #[test]
    fn proxies_are_honoured_unless_disabled() {
        let builder = HttpTransport::builder("http://localhost:8005");
        assert!(!builder.no_proxy);
        assert!(builder.no_proxy().no_proxy);
        assert!(HttpTransport::builder("http://localhost:8005").no_proxy().build().is_ok());
    }

    #[test]
    fn from_config_keeps_endpoint() {
        let config = ClientConfig::new("http://localhost:8005/bucky/v1/send");
        let transport = HttpTransport::from_config(&config).unwrap();
        assert_eq!(transport.endpoint().path(), "/bucky/v1/send");
    }
}
