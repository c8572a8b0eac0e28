#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Client for Ergast-compatible Formula 1 APIs.
//!
//! All requests go through the [`ErgastApi`] trait so that higher layers
//! (the stats aggregator and the update scheduler) can be driven by an
//! in-memory implementation in tests. [`ErgastClient`] is the HTTP
//! implementation; it retries every failed request according to a
//! [`retry::RetryPolicy`].
//!
//! The [`readers`] module maps raw envelopes into the flat records defined
//! in `f1_stats_api_models`.

pub mod client;
pub mod paginate;
pub mod readers;
pub mod retry;

use async_trait::async_trait;
use f1_stats_api_models::Envelope;

pub use client::{ClientOptions, ErgastClient};
pub use paginate::{PageOptions, fetch_all_races};
pub use retry::{FetchFailure, RetryPolicy};

/// Default public mirror of the Ergast API.
pub const DEFAULT_BASE_URL: &str = "https://api.jolpi.ca/ergast/f1";

/// Errors that can occur while talking to the API.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Every attempt failed; carries the cause of the last attempt.
    #[error("failed to fetch {url} after {attempts} attempts: {source}")]
    FetchExhausted {
        /// Request URL.
        url: String,
        /// Number of attempts made.
        attempts: u32,
        /// Failure of the final attempt.
        #[source]
        source: FetchFailure,
    },

    /// The response body was not a valid envelope.
    #[error("failed to decode response from {url}: {source}")]
    Decode {
        /// Request URL.
        url: String,
        /// Underlying JSON error.
        #[source]
        source: serde_json::Error,
    },

    /// The envelope decoded but a record in it could not be interpreted.
    #[error("malformed record: {message}")]
    Malformed {
        /// Description of what went wrong.
        message: String,
    },

    /// The HTTP client could not be constructed.
    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),
}

/// Access to paged API resources.
#[async_trait]
pub trait ErgastApi: Send + Sync {
    /// Fetches one page of `resource_path` (e.g. `"2025/drivers"` or
    /// `"drivers/hamilton/results"`).
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::FetchExhausted`] if the request could not be
    /// completed, or [`ApiError::Decode`] if the body is not an envelope.
    async fn fetch_page(
        &self,
        resource_path: &str,
        limit: u32,
        offset: u64,
    ) -> Result<Envelope, ApiError>;
}

#[async_trait]
impl<T: ErgastApi + ?Sized> ErgastApi for std::sync::Arc<T> {
    async fn fetch_page(
        &self,
        resource_path: &str,
        limit: u32,
        offset: u64,
    ) -> Result<Envelope, ApiError> {
        (**self).fetch_page(resource_path, limit, offset).await
    }
}
