// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Request client with deadline, retry and idempotency-key carriage.
//!
//! Each logical request carries one idempotency key, fixed when the
//! [`Request`] is built and reused by every retry so the remote service can
//! deduplicate. Each attempt gets a fresh trace id.

use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use tether_core::{Session, SessionProvider};
use tracing::{debug, warn};
use uuid::Uuid;

use super::retry::{RetryDecision, RetryPolicy, RetryState};
use super::transport::{
    HttpRequest, HttpResponse, HttpTransport, Method, ReqwestTransport, TransportError,
};

/// Per-attempt trace id header.
pub const HEADER_REQUEST_ID: &str = "X-Request-Id";
/// Per-logical-operation idempotency key header.
pub const HEADER_IDEMPOTENCY_KEY: &str = "X-Idempotency-Key";
/// Precondition header carrying the caller's expected version.
pub const HEADER_IF_MATCH: &str = "If-Match";

const CONTENT_TYPE_JSON: &str = "application/json";

/// Failure classes of a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Connection-level failure.
    TransientNetwork,
    /// 5xx or 429 response.
    TransientServer,
    /// Attempt deadline exceeded.
    Timeout,
    /// Any other non-success response, or an unusable payload.
    PermanentClient,
}

impl ErrorKind {
    /// Returns true if a failure of this kind is worth another attempt.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, ErrorKind::PermanentClient)
    }
}

/// Error type for request client operations.
#[derive(Debug, thiserror::Error)]
pub enum RequestError {
    #[error("network error: {0}")]
    Network(#[from] TransportError),

    #[error("server error: HTTP {status}: {body}")]
    Server { status: u16, body: String },

    #[error("request timed out after {}ms", .0.as_millis())]
    Timeout(Duration),

    #[error("request rejected: HTTP {status}: {body}")]
    Client { status: u16, body: String },

    #[error("invalid payload: {0}")]
    Payload(#[from] serde_json::Error),

    #[error("{last} (gave up after {attempts} attempts)")]
    Exhausted {
        attempts: u32,
        last: Box<RequestError>,
    },
}

impl RequestError {
    /// Classifies the error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            RequestError::Network(_) => ErrorKind::TransientNetwork,
            RequestError::Server { .. } => ErrorKind::TransientServer,
            RequestError::Timeout(_) => ErrorKind::Timeout,
            RequestError::Client { .. } | RequestError::Payload(_) => ErrorKind::PermanentClient,
            RequestError::Exhausted { last, .. } => last.kind(),
        }
    }

    /// HTTP status of the failure, if the server answered.
    pub fn status(&self) -> Option<u16> {
        match self {
            RequestError::Server { status, .. } | RequestError::Client { status, .. } => {
                Some(*status)
            }
            RequestError::Exhausted { last, .. } => last.status(),
            _ => None,
        }
    }
}

/// Result type for request client operations.
pub type RequestResult<T> = Result<T, RequestError>;

/// One logical request.
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    pub method: Method,
    pub path: String,
    pub body: Option<serde_json::Value>,
    pub headers: Vec<(String, String)>,
    /// Overrides the client's default attempt deadline.
    pub timeout: Option<Duration>,
    idempotency_key: String,
}

impl Request {
    /// Creates a request with a freshly generated idempotency key.
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Request {
            method,
            path: path.into(),
            body: None,
            headers: Vec::new(),
            timeout: None,
            idempotency_key: Uuid::new_v4().to_string(),
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::Get, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::Post, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::Put, path)
    }

    #[must_use]
    pub fn with_body(mut self, body: serde_json::Value) -> Self {
        self.body = Some(body);
        self
    }

    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Asserts the version the caller believes is current.
    #[must_use]
    pub fn with_expected_version(self, version: u64) -> Self {
        self.with_header(HEADER_IF_MATCH, version.to_string())
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Replaces the generated idempotency key.
    #[must_use]
    pub fn with_idempotency_key(mut self, key: impl Into<String>) -> Self {
        self.idempotency_key = key.into();
        self
    }

    pub fn idempotency_key(&self) -> &str {
        &self.idempotency_key
    }
}

/// Successful outcome of a request.
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    pub status: u16,
    /// Parsed JSON body; `None` for 204 or an empty body.
    pub body: Option<serde_json::Value>,
    /// Attempts made, the successful one included.
    pub attempts: u32,
}

impl Response {
    /// Decodes the body, treating an empty result as `{}`.
    pub fn json<T: DeserializeOwned>(&self) -> RequestResult<T> {
        let value = self
            .body
            .clone()
            .unwrap_or_else(|| serde_json::Value::Object(Default::default()));
        Ok(serde_json::from_value(value)?)
    }
}

/// Request client for the remote API.
pub struct RequestClient<T: HttpTransport = ReqwestTransport> {
    base_url: String,
    transport: T,
    policy: RetryPolicy,
    timeout: Duration,
    session: Arc<dyn SessionProvider>,
}

impl RequestClient<ReqwestTransport> {
    /// Create a new client with the default reqwest transport.
    pub fn new(base_url: impl Into<String>, policy: RetryPolicy, timeout: Duration) -> Self {
        Self::with_transport(base_url, ReqwestTransport::new(), policy, timeout)
    }
}

impl<T: HttpTransport> RequestClient<T> {
    /// Create a new client with a custom transport (for testing).
    pub fn with_transport(
        base_url: impl Into<String>,
        transport: T,
        policy: RetryPolicy,
        timeout: Duration,
    ) -> Self {
        RequestClient {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            transport,
            policy,
            timeout,
            session: Arc::new(Session::anonymous()),
        }
    }

    /// Attach a session provider for bearer-token carriage.
    #[must_use]
    pub fn with_session(mut self, session: Arc<dyn SessionProvider>) -> Self {
        self.session = session;
        self
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Execute a request, retrying transient failures per the policy.
    ///
    /// Terminal statuses are surfaced immediately. When the retry budget
    /// runs out the last error is returned wrapped in
    /// [`RequestError::Exhausted`] with the number of attempts made.
    pub async fn execute(&self, request: &Request) -> RequestResult<Response> {
        let mut retry = RetryState::new(self.policy.clone());

        loop {
            let attempt = retry.failures() + 1;
            let err = match self.attempt(request).await {
                Ok((status, body)) => {
                    return Ok(Response {
                        status,
                        body,
                        attempts: attempt,
                    });
                }
                Err(err) => err,
            };

            if !err.kind().is_retryable() {
                debug!(
                    "{} {} failed terminally on attempt {}: {}",
                    request.method, request.path, attempt, err
                );
                return Err(err);
            }

            match retry.record_failure() {
                RetryDecision::Retry(delay) => {
                    warn!(
                        "retry {} for {} {} in {}ms ({})",
                        attempt,
                        request.method,
                        request.path,
                        delay.as_millis(),
                        err
                    );
                    tokio::time::sleep(delay).await;
                }
                RetryDecision::GiveUp => {
                    return Err(RequestError::Exhausted {
                        attempts: attempt,
                        last: Box::new(err),
                    });
                }
            }
        }
    }

    /// Execute exactly one attempt, without retries.
    pub async fn execute_once(&self, request: &Request) -> RequestResult<Response> {
        let (status, body) = self.attempt(request).await?;
        Ok(Response {
            status,
            body,
            attempts: 1,
        })
    }

    async fn attempt(
        &self,
        request: &Request,
    ) -> RequestResult<(u16, Option<serde_json::Value>)> {
        let http = self.build(request)?;
        let deadline = request.timeout.unwrap_or(self.timeout);
        debug!(
            "{} {} (trace {})",
            http.method,
            http.url,
            http.header(HEADER_REQUEST_ID).unwrap_or("-")
        );

        // Dropping the send future on expiry cancels the in-flight attempt
        let response = match tokio::time::timeout(deadline, self.transport.send(http)).await {
            Ok(result) => result?,
            Err(_) => return Err(RequestError::Timeout(deadline)),
        };

        classify(response)
    }

    fn build(&self, request: &Request) -> RequestResult<HttpRequest> {
        let mut headers = vec![
            ("Content-Type".to_string(), CONTENT_TYPE_JSON.to_string()),
            (HEADER_REQUEST_ID.to_string(), Uuid::new_v4().to_string()),
            (
                HEADER_IDEMPOTENCY_KEY.to_string(),
                request.idempotency_key.clone(),
            ),
        ];
        if let Some(bearer) = self.session.session().bearer() {
            headers.push(("Authorization".to_string(), bearer));
        }
        headers.extend(request.headers.iter().cloned());

        let body = match &request.body {
            Some(value) => Some(serde_json::to_vec(value)?),
            None => None,
        };

        Ok(HttpRequest {
            method: request.method,
            url: format!("{}{}", self.base_url, request.path),
            headers,
            body,
        })
    }
}

/// Maps a raw response onto success or a classified failure.
fn classify(response: HttpResponse) -> RequestResult<(u16, Option<serde_json::Value>)> {
    let status = response.status;
    if response.is_success() {
        if status == 204 || response.body.iter().all(|b| b.is_ascii_whitespace()) {
            return Ok((status, None));
        }
        let body = serde_json::from_slice(&response.body)?;
        return Ok((status, Some(body)));
    }

    let body = response.text();
    if status == 429 || (500..600).contains(&status) {
        Err(RequestError::Server { status, body })
    } else {
        Err(RequestError::Client { status, body })
    }
}
