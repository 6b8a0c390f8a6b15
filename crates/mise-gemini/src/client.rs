// SPDX-FileCopyrightText: 2026 Mise Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Retrying HTTP client for the upstream generation endpoint.
//!
//! Transient failures are recognized by the upstream error message, not by
//! status code: a message containing "overloaded" or "internal error" (any
//! case) is retried with linear backoff, anything else fails immediately.

use std::time::Duration;

use mise_core::MiseError;
use reqwest::header::{HeaderMap, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use tracing::{debug, warn};

use crate::types::ApiErrorResponse;

/// Message substrings (lowercase) that mark an upstream failure as transient.
const TRANSIENT_MARKERS: &[&str] = &["overloaded", "internal error"];

/// Detail used when an error body carries no readable message.
pub const FALLBACK_ERROR_MESSAGE: &str = "API request failed";

/// Attempt budget and backoff base for one logical call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total upstream calls, first try included.
    pub max_attempts: u32,
    pub initial_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay: Duration::from_millis(1000),
        }
    }
}

impl RetryPolicy {
    /// Wait after the `attempt`-th (1-based) transient failure.
    pub fn backoff_delay(&self, attempt: u32) -> Duration {
        self.initial_delay.saturating_mul(attempt)
    }
}

/// Outcome of classifying a non-success response body.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Failure {
    Transient(String),
    Fatal(String),
}

/// Returns true if an upstream error message signals a retryable overload.
pub fn is_transient_message(message: &str) -> bool {
    let lower = message.to_lowercase();
    TRANSIENT_MARKERS.iter().any(|marker| lower.contains(marker))
}

fn classify(body: &str) -> Failure {
    match serde_json::from_str::<ApiErrorResponse>(body) {
        Ok(api_err) if is_transient_message(&api_err.error.message) => {
            Failure::Transient(api_err.error.message)
        }
        Ok(api_err) if !api_err.error.message.is_empty() => Failure::Fatal(api_err.error.message),
        _ => Failure::Fatal(FALLBACK_ERROR_MESSAGE.to_string()),
    }
}

/// HTTP client that owns the API key header and the retry loop.
#[derive(Debug, Clone)]
pub struct RetryingClient {
    client: reqwest::Client,
    policy: RetryPolicy,
}

impl RetryingClient {
    /// Creates a client that authenticates every request with `api_key`.
    pub fn new(
        api_key: &SecretString,
        timeout: Duration,
        policy: RetryPolicy,
    ) -> Result<Self, MiseError> {
        let mut key = HeaderValue::from_str(api_key.expose_secret())
            .map_err(|e| MiseError::Config(format!("invalid API key header value: {e}")))?;
        key.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert("x-goog-api-key", key);
        headers.insert("content-type", HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|e| MiseError::Upstream {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self { client, policy })
    }

    /// POSTs `payload` to `endpoint` and returns the first successful response.
    ///
    /// Each transient failure consumes one attempt and is followed by a
    /// `n * initial_delay` pause; exhausting the budget yields
    /// [`MiseError::ServiceUnavailable`]. A send failure or any other error
    /// body fails at once.
    pub async fn call<T>(&self, endpoint: &str, payload: &T) -> Result<reqwest::Response, MiseError>
    where
        T: Serialize + ?Sized,
    {
        let max_attempts = self.policy.max_attempts;

        for attempt in 1..=max_attempts {
            let response = self
                .client
                .post(endpoint)
                .json(payload)
                .send()
                .await
                .map_err(|e| MiseError::Upstream {
                    message: format!("HTTP request failed: {e}"),
                    source: Some(Box::new(e)),
                })?;

            let status = response.status();
            debug!(status = %status, attempt, "upstream response received");

            if status.is_success() {
                return Ok(response);
            }

            let body = response.text().await.unwrap_or_default();
            match classify(&body) {
                Failure::Transient(message) => {
                    let delay = self.policy.backoff_delay(attempt);
                    warn!(
                        attempt,
                        max_attempts,
                        status = %status,
                        delay_ms = delay.as_millis() as u64,
                        error = %message,
                        "transient upstream failure, backing off"
                    );
                    tokio::time::sleep(delay).await;
                }
                Failure::Fatal(message) => {
                    debug!(status = %status, attempt, "non-transient upstream failure");
                    return Err(MiseError::upstream(message));
                }
            }
        }

        Err(MiseError::ServiceUnavailable {
            attempts: max_attempts,
        })
    }
}
