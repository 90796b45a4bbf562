//! Conversions from external infrastructure errors into domain errors.

use bucky_domain::BuckyError;
use reqwest::Error as HttpError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub BuckyError);

impl From<InfraError> for BuckyError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<BuckyError> for InfraError {
    fn from(value: BuckyError) -> Self {
        InfraError(value)
    }
}

trait IntoBuckyError {
    fn into_bucky(self) -> BuckyError;
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → BuckyError */
/* -------------------------------------------------------------------------- */

impl IntoBuckyError for HttpError {
    fn into_bucky(self) -> BuckyError {
        if self.is_builder() {
            return BuckyError::Configuration(format!("invalid HTTP client settings: {self}"));
        }

        if self.is_timeout() {
            return BuckyError::Transport("HTTP request timed out".into());
        }

        if self.is_connect() {
            return BuckyError::Transport(format!("HTTP connection failure: {self}"));
        }

        BuckyError::Transport(self.to_string())
    }
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        InfraError(value.into_bucky())
    }
}

/* -------------------------------------------------------------------------- */
/* url::ParseError → BuckyError */
/* -------------------------------------------------------------------------- */

impl From<url::ParseError> for InfraError {
    fn from(value: url::ParseError) -> Self {
        InfraError(BuckyError::Configuration(format!("invalid endpoint URL: {value}")))
    }
}

#[cfg(test)]
mod tests {
    use reqwest::Client;

    use super::*;

    #[tokio::test]
    async fn connection_refused_maps_to_transport() {
        // Port 9 (discard) on loopback is closed on test machines.
        let client = Client::builder().no_proxy().build().unwrap();
        let err = client.post("http://127.0.0.1:9/").send().await.unwrap_err();

        let mapped: BuckyError = InfraError::from(err).into();
        assert!(matches!(mapped, BuckyError::Transport(_)), "got {mapped:?}");
    }

    #[test]
    fn bad_url_maps_to_configuration() {
        let err = url::Url::parse("not a url").unwrap_err();
        let mapped: BuckyError = InfraError::from(err).into();
        assert!(matches!(mapped, BuckyError::Configuration(_)));
    }
}
