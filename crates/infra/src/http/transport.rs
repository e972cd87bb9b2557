//! Retrying HTTP client for service-to-service calls.
//!
//! One logical outbound request, up to `1 + max_retries` attempts. Retry
//! eligibility is deliberately narrow:
//!
//! - a connection-phase failure (no response received at all) is retried —
//!   refused/reset connections unconditionally, other network errors when the
//!   method is idempotent;
//! - a received `503` is retried;
//! - any other received status — `404` and `500` included — is returned as-is.
//!
//! Backoff is exponential per attempt (base, 2x, 4x, ...). The transport
//! assigns no domain meaning to outcomes: after the budget is spent, the last
//! observed response or connection error is handed to the caller verbatim.

use std::time::{Duration, Instant};

use reqwest::{Method, StatusCode};
use thiserror::Error;
use tracing::{debug, warn};

/// Header carrying the shared secret for downstream authentication.
pub const API_KEY_HEADER: &str = "X-API-Key";

/// Bounded-retry policy with exponential backoff.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Attempts beyond the first (3 retries = 4 total attempts).
    pub max_retries: u32,
    /// Delay before the first retry; doubles per subsequent retry.
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay: Duration::from_millis(100),
        }
    }
}

impl RetryPolicy {
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_base_delay(mut self, base_delay: Duration) -> Self {
        self.base_delay = base_delay;
        self
    }

    /// Backoff before the retry following `attempt` (1-based).
    fn delay_after(&self, attempt: u32) -> Duration {
        self.base_delay * 2u32.saturating_pow(attempt.saturating_sub(1))
    }
}

/// Transport configuration, constructed once at process start.
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    pub base_url: String,
    /// Shared secret attached as `X-API-Key` when present. The transport does
    /// not fail when it is missing; rejecting the call is the downstream's
    /// concern.
    pub api_key: Option<String>,
    /// Per-attempt timeout.
    pub timeout: Duration,
    pub retry: RetryPolicy,
}

impl HttpClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: None,
            timeout: Duration::from_millis(5000),
            retry: RetryPolicy::default(),
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }
}

/// A response received from the downstream, whatever its status.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: StatusCode,
    pub body: String,
    /// Attempts spent on this logical request (1 = no retries).
    pub attempts: u32,
    pub elapsed: Duration,
}

/// Why a connection-phase failure produced no response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionErrorKind {
    /// The attempt was aborted or the per-attempt timeout elapsed.
    TimedOut,
    /// The connection could not be established (refused, unreachable, DNS).
    Refused,
    /// Anything else pre-response (e.g. the stream dropped mid-body).
    Other,
}

/// Failure with no response at all, surfaced after the retry budget is spent.
#[derive(Debug, Error)]
#[error("GET {url} produced no response after {attempts} attempt(s) ({kind:?})")]
pub struct TransportError {
    pub url: String,
    pub kind: ConnectionErrorKind,
    pub attempts: u32,
    pub elapsed: Duration,
    #[source]
    pub source: reqwest::Error,
}

/// Outbound HTTP client with bounded retries.
#[derive(Debug, Clone)]
pub struct RetryingHttpClient {
    client: reqwest::Client,
    config: HttpClientConfig,
}

impl RetryingHttpClient {
    pub fn new(config: HttpClientConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;
        Ok(Self { client, config })
    }

    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    /// Issue one logical GET for `path` (joined onto the base URL).
    pub async fn get(&self, path: &str) -> Result<RawResponse, TransportError> {
        self.request(Method::GET, path).await
    }

    async fn request(&self, method: Method, path: &str) -> Result<RawResponse, TransportError> {
        let url = join_url(&self.config.base_url, path);
        let max_attempts = self.config.retry.max_retries + 1;
        let started = Instant::now();
        let mut attempt = 0u32;

        loop {
            attempt += 1;

            let mut request = self.client.request(method.clone(), &url);
            if let Some(api_key) = &self.config.api_key {
                request = request.header(API_KEY_HEADER, api_key);
            }

            let error = match request.send().await {
                Ok(response) => {
                    let status = response.status();

                    if status == StatusCode::SERVICE_UNAVAILABLE && attempt < max_attempts {
                        warn!(%url, attempt, "downstream returned 503, retrying");
                        tokio::time::sleep(self.config.retry.delay_after(attempt)).await;
                        continue;
                    }

                    // Every other status — success, 404, 500, or a final 503 —
                    // is the caller's to interpret.
                    match response.text().await {
                        Ok(body) => {
                            return Ok(RawResponse {
                                status,
                                body,
                                attempts: attempt,
                                elapsed: started.elapsed(),
                            });
                        }
                        Err(err) => err,
                    }
                }
                Err(err) => err,
            };

            let kind = classify_connection_error(&error);
            if attempt < max_attempts && retry_eligible(&method, kind) {
                debug!(%url, attempt, ?kind, "connection failed, retrying");
                tokio::time::sleep(self.config.retry.delay_after(attempt)).await;
                continue;
            }

            return Err(TransportError {
                url,
                kind,
                attempts: attempt,
                elapsed: started.elapsed(),
                source: error,
            });
        }
    }
}

/// A connection-phase failure is retried when no response was received at all
/// (refused/reset before any byte came back) or when repeating the request is
/// side-effect free.
fn retry_eligible(method: &Method, kind: ConnectionErrorKind) -> bool {
    kind == ConnectionErrorKind::Refused || is_idempotent(method)
}

fn is_idempotent(method: &Method) -> bool {
    matches!(method.as_str(), "GET" | "HEAD" | "OPTIONS" | "PUT" | "DELETE")
}

fn classify_connection_error(err: &reqwest::Error) -> ConnectionErrorKind {
    if err.is_timeout() {
        ConnectionErrorKind::TimedOut
    } else if err.is_connect() {
        ConnectionErrorKind::Refused
    } else {
        ConnectionErrorKind::Other
    }
}

fn join_url(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
}
