//! HTTP retry helpers.
//!
//! Every request made by [`crate::ErgastClient`] goes through
//! [`send_json`], which retries transport errors and non-2xx responses
//! with a fixed delay between attempts.
//!
//! Client errors (4xx) are retried exactly like server errors. An invalid
//! season therefore costs the full retry budget before failing.
//!
//! # Usage
//!
//! ```ignore
//! use crate::retry;
//!
//! let envelope: Envelope = retry::send_json(&policy, &url, || client.get(&url)).await?;
//! ```

use std::future::Future;
use std::time::Duration;

use serde::de::DeserializeOwned;

use crate::ApiError;

/// Number of attempts (including the first) made for a single request.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Pause between two attempts.
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(2);

/// How often and how patiently a request is retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first. Values below 1 are treated as 1.
    pub max_attempts: u32,
    /// Fixed delay slept before every attempt after the first.
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            delay: DEFAULT_RETRY_DELAY,
        }
    }
}

/// Why a single attempt failed.
#[derive(Debug, thiserror::Error)]
pub enum FetchFailure {
    /// Connection, timeout or body-read failure.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server answered with a non-2xx status.
    #[error("HTTP {status}")]
    Status {
        /// The status code returned.
        status: reqwest::StatusCode,
    },
}

/// Sends the request built by `build_request`, retrying per `policy`, and
/// decodes the body as JSON.
///
/// The closure is called once per attempt since a
/// [`reqwest::RequestBuilder`] is consumed by `send()`.
///
/// # Errors
///
/// * [`ApiError::FetchExhausted`] once every attempt has failed.
/// * [`ApiError::Decode`] if a 2xx body is not valid JSON for `T`. Decode
///   failures are not retried.
#[allow(clippy::future_not_send)]
pub async fn send_json<T, F>(
    policy: &RetryPolicy,
    url: &str,
    build_request: F,
) -> Result<T, ApiError>
where
    T: DeserializeOwned,
    F: Fn() -> reqwest::RequestBuilder,
{
    let build_request = &build_request;
    let text = with_retries(policy, url, move || async move {
        let response = build_request().send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchFailure::Status { status });
        }
        Ok(response.text().await?)
    })
    .await?;

    serde_json::from_str(&text).map_err(|source| ApiError::Decode {
        url: url.to_owned(),
        source,
    })
}

/// Core retry loop.
///
/// Runs `attempt` until it succeeds or `policy.max_attempts` attempts
/// have failed, sleeping `policy.delay` between attempts.
///
/// # Errors
///
/// Returns [`ApiError::FetchExhausted`] carrying the last failure.
pub async fn with_retries<T, F, Fut>(
    policy: &RetryPolicy,
    url: &str,
    mut attempt: F,
) -> Result<T, ApiError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, FetchFailure>>,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt_no = 1;

    loop {
        match attempt().await {
            Ok(value) => return Ok(value),
            Err(failure) if attempt_no < max_attempts => {
                log::warn!(
                    "Request failed ({attempt_no}/{max_attempts}): {url}: {failure}, retrying in {:?}",
                    policy.delay
                );
            }
            Err(failure) => {
                log::error!("Request failed ({attempt_no}/{max_attempts}), giving up: {url}: {failure}");
                return Err(ApiError::FetchExhausted {
                    url: url.to_owned(),
                    attempts: max_attempts,
                    source: failure,
                });
            }
        }

        tokio::time::sleep(policy.delay).await;
        attempt_no += 1;
    }
}
