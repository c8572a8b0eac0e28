//! HTTP implementation of [`ErgastApi`].

use std::time::Duration;

use async_trait::async_trait;
use f1_stats_api_models::Envelope;

use crate::retry::{self, RetryPolicy};
use crate::{ApiError, DEFAULT_BASE_URL, ErgastApi};

/// Per-request socket timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Connection settings for [`ErgastClient`].
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// Base URL without a trailing slash, e.g. `https://api.jolpi.ca/ergast/f1`.
    pub base_url: String,
    /// Timeout applied to every individual request.
    pub timeout: Duration,
    /// Retry behaviour for failed requests.
    pub retry: RetryPolicy,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            timeout: DEFAULT_TIMEOUT,
            retry: RetryPolicy::default(),
        }
    }
}

/// Ergast API client backed by [`reqwest`].
#[derive(Debug, Clone)]
pub struct ErgastClient {
    http: reqwest::Client,
    base_url: String,
    retry: RetryPolicy,
}

impl ErgastClient {
    /// Builds a client from `options`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Client`] if the underlying HTTP client cannot be
    /// built.
    pub fn new(options: ClientOptions) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(options.timeout)
            .user_agent(concat!("f1_stats/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            base_url: options.base_url.trim_end_matches('/').to_owned(),
            retry: options.retry,
        })
    }

    /// The base URL requests are resolved against.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Builds the full URL for one page of `resource_path`.
    #[must_use]
    pub fn page_url(&self, resource_path: &str, limit: u32, offset: u64) -> String {
        format!(
            "{}/{}.json?limit={limit}&offset={offset}",
            self.base_url,
            resource_path.trim_matches('/')
        )
    }
}

#[async_trait]
impl ErgastApi for ErgastClient {
    async fn fetch_page(
        &self,
        resource_path: &str,
        limit: u32,
        offset: u64,
    ) -> Result<Envelope, ApiError> {
        let url = self.page_url(resource_path, limit, offset);
        log::debug!("GET {url}");
        retry::send_json(&self.retry, &url, || self.http.get(&url)).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};

    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    use super::*;
    use crate::FetchFailure;

    /// Serves canned HTTP responses on a loopback port, one per connection.
    /// The last response is repeated once the list is exhausted.
    async fn serve(responses: Vec<(u16, &'static str)>) -> (String, Arc<AtomicU32>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let hits = Arc::new(AtomicU32::new(0));
        let counter = Arc::clone(&hits);

        tokio::spawn(async move {
            loop {
                let Ok((mut socket, _)) = listener.accept().await else {
                    return;
                };
                let n = counter.fetch_add(1, Ordering::SeqCst) as usize;
                let (status, body) = responses[n.min(responses.len() - 1)];

                let mut buf = vec![0u8; 4096];
                let mut read = 0;
                while !buf[..read].windows(4).any(|w| w == b"\r\n\r\n") {
                    match socket.read(&mut buf[read..]).await {
                        Ok(0) | Err(_) => break,
                        Ok(len) => read += len,
                    }
                }

                let reply = format!(
                    "HTTP/1.1 {status} Status\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                    body.len()
                );
                let _ = socket.write_all(reply.as_bytes()).await;
                let _ = socket.shutdown().await;
            }
        });

        (format!("http://{addr}"), hits)
    }

    fn client(base_url: String) -> ErgastClient {
        ErgastClient::new(ClientOptions {
            base_url,
            timeout: Duration::from_secs(5),
            retry: RetryPolicy {
                max_attempts: 3,
                delay: Duration::ZERO,
            },
        })
        .unwrap()
    }

    #[test]
    fn builds_page_urls() {
        let client = client("https://example.test/ergast/f1/".to_owned());
        assert_eq!(
            client.page_url("drivers/alonso/results", 100, 200),
            "https://example.test/ergast/f1/drivers/alonso/results.json?limit=100&offset=200"
        );
    }

    #[tokio::test]
    async fn decodes_envelope() {
        let (base, hits) = serve(vec![(200, r#"{"MRData":{"total":"0"}}"#)]).await;
        let envelope = client(base).fetch_page("2025/races", 30, 0).await.unwrap();
        assert_eq!(envelope.total(), 0);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn retries_server_errors_then_succeeds() {
        let (base, hits) = serve(vec![
            (503, ""),
            (500, ""),
            (200, r#"{"MRData":{"total":"5"}}"#),
        ])
        .await;
        let envelope = client(base).fetch_page("2025/races", 30, 0).await.unwrap();
        assert_eq!(envelope.total(), 5);
        assert_eq!(hits.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn client_errors_exhaust_retries() {
        let (base, hits) = serve(vec![(404, "")]).await;
        let err = client(base)
            .fetch_page("1800/races", 30, 0)
            .await
            .unwrap_err();

        assert_eq!(hits.load(Ordering::SeqCst), 3);
        assert!(matches!(
            err,
            ApiError::FetchExhausted {
                attempts: 3,
                source: FetchFailure::Status { status },
                ..
            } if status == reqwest::StatusCode::NOT_FOUND
        ));
    }

    #[tokio::test]
    async fn invalid_body_is_a_decode_error() {
        let (base, hits) = serve(vec![(200, "<html>oops</html>")]).await;
        let err = client(base).fetch_page("2025/races", 30, 0).await.unwrap_err();
        assert!(matches!(err, ApiError::Decode { .. }));
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }
}
