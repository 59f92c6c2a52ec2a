//! Test doubles for providers and transports.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rust_decimal::Decimal;
use swap_types::{
    HttpContext, HttpRequest, HttpResponse, ProviderError, Rate, RateProvider, RateQuery,
    RequestFactory, Transport, TransportError,
};

/// Transport replaying canned responses in order and recording every request.
#[derive(Default)]
pub struct MockTransport {
    responses: Mutex<VecDeque<Result<HttpResponse, TransportError>>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a response.
    pub fn respond(self, status: u16, body: impl Into<String>) -> Self {
        self.responses
            .lock()
            .unwrap()
            .push_back(Ok(HttpResponse::new(status, body)));
        self
    }

    /// Queues a transport failure.
    pub fn fail(self, error: TransportError) -> Self {
        self.responses.lock().unwrap().push_back(Err(error));
        self
    }

    /// Requests sent so far.
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// URL of the most recent request.
    pub fn last_url(&self) -> Option<String> {
        self.requests.lock().unwrap().last().map(|r| r.url.clone())
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        self.requests.lock().unwrap().push(request);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(TransportError::Connection("no canned response".into())))
    }
}

/// Request factory that adds no headers.
pub struct PlainRequests;

impl RequestFactory for PlainRequests {
    fn create_request(&self, url: &str) -> HttpRequest {
        HttpRequest::get(url)
    }
}

/// Builds an `HttpContext` around a mock transport.
pub fn http_context(transport: Arc<MockTransport>) -> HttpContext {
    HttpContext::new(transport, Arc::new(PlainRequests))
}

/// What a [`ScriptedProvider`] does on every call.
#[derive(Debug, Clone)]
pub enum Outcome {
    Succeed(Decimal),
    Unsupported,
    Unavailable,
    TransportFailure,
}

/// Provider with a fixed outcome that counts its invocations.
pub struct ScriptedProvider {
    name: String,
    outcome: Outcome,
    calls: AtomicUsize,
}

impl ScriptedProvider {
    pub fn new(name: impl Into<String>, outcome: Outcome) -> Self {
        Self {
            name: name.into(),
            outcome,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RateProvider for ScriptedProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn resolve(&self, query: &RateQuery) -> Result<Rate, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.outcome {
            Outcome::Succeed(value) => Ok(Rate::new(query.clone(), *value, &self.name)?),
            Outcome::Unsupported => Err(ProviderError::UnsupportedQuery(format!(
                "{} cannot serve {}",
                self.name, query
            ))),
            Outcome::Unavailable => Err(ProviderError::QuoteUnavailable(format!(
                "{} has no quote for {}",
                self.name, query
            ))),
            Outcome::TransportFailure => Err(ProviderError::Transport(
                TransportError::Timeout(format!("{} timed out", self.name)),
            )),
        }
    }
}
