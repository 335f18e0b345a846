//! HTTP client wrapper for probing and fetching remote files.
//!
//! This module provides the `HttpClient` struct which performs the
//! same-origin HEAD probe and the GET that turns a URL into a [`Blob`].

use std::time::Duration;

use reqwest::Client;
use reqwest::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use tracing::{debug, instrument};
use url::Url;

use super::constants::{CONNECT_TIMEOUT_SECS, READ_TIMEOUT_SECS};
use super::error::DownloadError;
use super::filename::{parse_content_disposition, sanitize_filename};
use crate::blob::Blob;
use crate::user_agent;

/// HTTP client for probing and fetching files.
///
/// This client is designed to be created once and reused for every save,
/// taking advantage of connection pooling.
///
/// # Example
///
/// ```no_run
/// use qrsave_core::download::HttpClient;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = HttpClient::new();
/// let blob = client.fetch_blob("https://example.com/qr.svg").await?;
/// println!("fetched {} bytes", blob.len());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
}

impl Default for HttpClient {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpClient {
    /// Creates a new HTTP client with default timeouts.
    ///
    /// Default configuration:
    /// - Connect timeout: 30 seconds
    /// - Read timeout: 5 minutes
    /// - Gzip decompression: enabled
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client builder fails to build with the static
    /// configuration. This should never happen in practice.
    #[must_use]
    pub fn new() -> Self {
        Self::new_with_timeouts(CONNECT_TIMEOUT_SECS, READ_TIMEOUT_SECS)
    }

    /// Creates a new HTTP client with explicit timeout values.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client builder fails to build with the supplied
    /// timeout configuration.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn new_with_timeouts(connect_timeout_secs: u64, read_timeout_secs: u64) -> Self {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(connect_timeout_secs))
            .timeout(Duration::from_secs(read_timeout_secs))
            .gzip(true)
            .user_agent(user_agent::default_user_agent())
            .build()
            .expect("failed to build HTTP client with static configuration");
        Self { client }
    }

    /// Same-origin/CORS probe: a HEAD request that succeeds with a 2xx status.
    ///
    /// The probe is awaited to completion before the caller branches, and any
    /// failure (network, non-2xx, malformed URL) reads as `false`. It is a
    /// heuristic for choosing between fetching and opening a URL, never a
    /// security check.
    #[instrument(skip(self), fields(url = %url))]
    pub async fn probe(&self, url: &str) -> bool {
        match self.client.head(url).send().await {
            Ok(response) => {
                let status = response.status();
                debug!(status = status.as_u16(), "probe response");
                status.is_success()
            }
            Err(error) => {
                debug!(%error, "probe failed");
                false
            }
        }
    }

    /// Fetches a URL into a [`Blob`].
    ///
    /// The blob's type comes from the `Content-Type` header (empty when
    /// absent) and its intrinsic name from `Content-Disposition`, if any.
    ///
    /// # Errors
    ///
    /// Returns `DownloadError` if:
    /// - The URL is invalid
    /// - The request fails (network error, timeout)
    /// - The server returns a non-2xx status
    #[instrument(skip(self), fields(url = %url))]
    pub async fn fetch_blob(&self, url: &str) -> Result<Blob, DownloadError> {
        let parsed = Url::parse(url).map_err(|_| DownloadError::invalid_url(url))?;

        let response = self
            .client
            .get(parsed)
            .send()
            .await
            .map_err(|e| DownloadError::network(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DownloadError::http_status(url, status.as_u16()));
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        let disposition_name = response
            .headers()
            .get(CONTENT_DISPOSITION)
            .and_then(|v| v.to_str().ok())
            .and_then(parse_content_disposition)
            .map(|name| sanitize_filename(&name));

        let bytes = response
            .bytes()
            .await
            .map_err(|e| DownloadError::network(url, e))?;
        debug!(bytes = bytes.len(), content_type = %content_type, "fetched blob");

        let blob = Blob::new(bytes, content_type);
        Ok(match disposition_name {
            Some(name) => blob.with_name(name),
            None => blob,
        })
    }
}
