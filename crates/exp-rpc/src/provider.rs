//! Provider layer: the only boundary the bindings depend on

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;

use crate::envelope::{RequestEnvelope, ResponseEnvelope};
use crate::error::{error_code, TransportError};

/// Executes request envelopes against a node (object-safe)
///
/// Implementations own framing, correlation ids and connectivity. A
/// protocol-level error is returned inside `Ok(ResponseEnvelope)`; `Err` is
/// reserved for exchanges that could not be completed.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Send one request and wait for its response
    async fn send(&self, request: RequestEnvelope) -> Result<ResponseEnvelope, TransportError>;
}

#[derive(Debug, Clone)]
enum MockReply {
    Result(Value),
    Remote { code: i64, message: String },
    Failure(TransportError),
}

/// In-memory provider for tests
///
/// Replies are keyed by target-operation name. Every envelope received is
/// recorded, so tests can assert on exactly what would have gone over the
/// wire.
#[derive(Default)]
pub struct MockProvider {
    replies: Mutex<HashMap<String, MockReply>>,
    delays: Mutex<HashMap<String, Duration>>,
    requests: Mutex<Vec<RequestEnvelope>>,
    request_id: AtomicU64,
}

impl MockProvider {
    /// Create a mock with no canned replies
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `method` with a successful result
    pub fn set_result(&self, method: &str, result: Value) {
        self.replies
            .lock()
            .insert(method.to_string(), MockReply::Result(result));
    }

    /// Answer `method` with a JSON-RPC error
    pub fn set_error(&self, method: &str, code: i64, message: &str) {
        self.replies.lock().insert(
            method.to_string(),
            MockReply::Remote {
                code,
                message: message.to_string(),
            },
        );
    }

    /// Fail `method` at the transport level
    pub fn set_failure(&self, method: &str, error: TransportError) {
        self.replies
            .lock()
            .insert(method.to_string(), MockReply::Failure(error));
    }

    /// Hold the reply to `method` back for `delay`
    pub fn set_delay(&self, method: &str, delay: Duration) {
        self.delays.lock().insert(method.to_string(), delay);
    }

    /// Envelopes received so far, in arrival order
    pub fn requests(&self) -> Vec<RequestEnvelope> {
        self.requests.lock().clone()
    }

    /// Number of envelopes received so far
    pub fn request_count(&self) -> usize {
        self.requests.lock().len()
    }

    /// Most recent envelope, if any
    pub fn last_request(&self) -> Option<RequestEnvelope> {
        self.requests.lock().last().cloned()
    }

    /// Forget canned replies and recorded requests
    pub fn clear(&self) {
        self.replies.lock().clear();
        self.delays.lock().clear();
        self.requests.lock().clear();
    }
}

#[async_trait]
impl Provider for MockProvider {
    async fn send(&self, request: RequestEnvelope) -> Result<ResponseEnvelope, TransportError> {
        let id = self.request_id.fetch_add(1, Ordering::SeqCst) + 1;
        let reply = self.replies.lock().get(&request.method).cloned();
        let delay = self.delays.lock().get(&request.method).copied();
        let method = request.method.clone();
        self.requests.lock().push(request);

        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        match reply {
            Some(MockReply::Result(result)) => Ok(ResponseEnvelope::success(id, result)),
            Some(MockReply::Remote { code, message }) => {
                Ok(ResponseEnvelope::failure(id, code, message))
            }
            Some(MockReply::Failure(error)) => Err(error),
            None => Ok(ResponseEnvelope::failure(
                id,
                error_code::METHOD_NOT_FOUND,
                format!("Method not found: {}", method),
            )),
        }
    }
}

/// Default HTTP request timeout
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// HTTP provider for real RPC communication
#[cfg(feature = "http")]
pub struct HttpProvider {
    client: reqwest::Client,
    url: String,
    request_id: AtomicU64,
}

#[cfg(feature = "http")]
impl HttpProvider {
    /// Create a new HTTP provider with the default timeout
    pub fn new(url: &str) -> Result<Self, TransportError> {
        Self::with_timeout(url, DEFAULT_HTTP_TIMEOUT)
    }

    /// Create a new HTTP provider with an explicit request timeout
    pub fn with_timeout(url: &str, timeout: Duration) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TransportError::Connection(e.to_string()))?;
        Ok(Self {
            client,
            url: url.to_string(),
            request_id: AtomicU64::new(1),
        })
    }

    /// Endpoint URL
    pub fn url(&self) -> &str {
        &self.url
    }

    fn next_id(&self) -> u64 {
        self.request_id.fetch_add(1, Ordering::SeqCst)
    }
}

#[cfg(feature = "http")]
#[async_trait]
impl Provider for HttpProvider {
    async fn send(&self, request: RequestEnvelope) -> Result<ResponseEnvelope, TransportError> {
        let id = self.next_id();
        tracing::trace!(id, method = %request.method, url = %self.url, "posting request");

        let response = self
            .client
            .post(&self.url)
            .json(&request.to_payload(id))
            .send()
            .await
            .map_err(|e| TransportError::Connection(e.to_string()))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| TransportError::Connection(e.to_string()))?;

        match serde_json::from_slice::<ResponseEnvelope>(&body) {
            Ok(envelope) => Ok(envelope),
            Err(_) if !status.is_success() => Err(TransportError::Status(status.as_u16())),
            Err(e) => Err(TransportError::Decode(e.to_string())),
        }
    }
}
