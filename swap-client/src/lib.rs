//! # Swap Client
//!
//! HTTP transport for Swap's rate providers, backed by `reqwest`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use swap_types::{
    HttpRequest, HttpResponse, RequestFactory, Transport, TransportError, redact_url,
};
use tracing::debug;

/// Default request timeout applied by [`ReqwestTransport::new`].
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Error type for client construction.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Transport performing real HTTP calls.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    http: Client,
}

impl ReqwestTransport {
    /// Creates a transport with the default timeout.
    pub fn new() -> Result<Self, ClientError> {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    /// Creates a transport whose requests time out after `timeout`.
    pub fn with_timeout(timeout: Duration) -> Result<Self, ClientError> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self { http })
    }

    /// Wraps an already configured client.
    pub fn from_client(http: Client) -> Self {
        Self { http }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let mut builder = self.http.get(&request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let resp = builder.send().await.map_err(classify)?;
        let status = resp.status().as_u16();
        let body = resp.text().await.map_err(classify)?;

        debug!(url = %redact_url(&request.url), status, "HTTP response received");
        Ok(HttpResponse { status, body })
    }
}

/// Maps a reqwest error, keeping the request URL (and any access key in it) out of the message.
fn classify(err: reqwest::Error) -> TransportError {
    let timeout = err.is_timeout();
    let message = redact_url(&err.without_url().to_string());
    if timeout {
        TransportError::Timeout(message)
    } else {
        TransportError::Connection(message)
    }
}

/// Request factory adding JSON accept and user agent headers.
#[derive(Debug, Clone)]
pub struct DefaultRequestFactory {
    user_agent: String,
}

impl DefaultRequestFactory {
    pub fn new() -> Self {
        Self {
            user_agent: format!("swap/{}", env!("CARGO_PKG_VERSION")),
        }
    }

    /// Sets the user agent sent with every request.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

impl Default for DefaultRequestFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl RequestFactory for DefaultRequestFactory {
    fn create_request(&self, url: &str) -> HttpRequest {
        HttpRequest::get(url)
            .with_header("Accept", "application/json")
            .with_header("User-Agent", self.user_agent.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_request_headers() {
        let request = DefaultRequestFactory::new().create_request("https://example.test/latest");
        assert_eq!(request.url, "https://example.test/latest");
        assert!(
            request
                .headers
                .contains(&("Accept".to_string(), "application/json".to_string()))
        );
        assert!(
            request
                .headers
                .iter()
                .any(|(name, value)| name == "User-Agent" && value.starts_with("swap/"))
        );
    }

    #[test]
    fn test_custom_user_agent() {
        let request = DefaultRequestFactory::new()
            .with_user_agent("my-app/2.0")
            .create_request("https://example.test");
        assert!(
            request
                .headers
                .contains(&("User-Agent".to_string(), "my-app/2.0".to_string()))
        );
    }

    #[tokio::test]
    async fn test_connection_refused_is_transport_error() {
        let transport = ReqwestTransport::with_timeout(Duration::from_secs(2)).unwrap();
        let result = transport
            .send(HttpRequest::get("http://127.0.0.1:1/latest"))
            .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_transport_error_hides_access_key() {
        let transport = ReqwestTransport::with_timeout(Duration::from_secs(2)).unwrap();
        let err = transport
            .send(HttpRequest::get(
                "http://127.0.0.1:1/latest?access_key=topsecret&symbols=USD",
            ))
            .await
            .unwrap_err();

        assert!(!err.to_string().contains("topsecret"), "{err}");
    }
}
