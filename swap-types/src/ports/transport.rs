//! Outbound HTTP ports used by HTTP-backed providers.

use std::fmt;
use std::sync::Arc;

use crate::error::TransportError;

/// An outbound GET request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub url: String,
    pub headers: Vec<(String, String)>,
}

impl HttpRequest {
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            headers: Vec::new(),
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }
}

/// A raw response: status code and body text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Masks `access_key` query values so URLs can be logged or put in errors.
pub fn redact_url(url: &str) -> String {
    const PARAM: &str = "access_key=";
    let mut redacted = String::with_capacity(url.len());
    let mut rest = url;
    while let Some(start) = rest.find(PARAM) {
        let value_start = start + PARAM.len();
        let value_end = rest[value_start..]
            .find(['&', '#', ')', ' '])
            .map_or(rest.len(), |i| value_start + i);
        redacted.push_str(&rest[..value_start]);
        redacted.push_str("***");
        rest = &rest[value_end..];
    }
    redacted.push_str(rest);
    redacted
}

/// Performs outbound requests.
#[async_trait::async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;
}

/// Builds outbound requests (default headers, user agent, ...).
pub trait RequestFactory: Send + Sync {
    fn create_request(&self, url: &str) -> HttpRequest;
}

/// The transport and request factory handed to HTTP providers at build time.
#[derive(Clone)]
pub struct HttpContext {
    pub transport: Arc<dyn Transport>,
    pub requests: Arc<dyn RequestFactory>,
}

impl HttpContext {
    pub fn new(transport: Arc<dyn Transport>, requests: Arc<dyn RequestFactory>) -> Self {
        Self {
            transport,
            requests,
        }
    }

    /// Builds a request for `url` and sends it.
    pub async fn get(&self, url: &str) -> Result<HttpResponse, TransportError> {
        let request = self.requests.create_request(url);
        self.transport.send(request).await
    }
}

impl fmt::Debug for HttpContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpContext").finish_non_exhaustive()
    }
}
