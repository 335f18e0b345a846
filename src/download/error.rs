//! Fetch and write failures.
//!
//! None of these escape [`Saver::save`](crate::Saver::save): the dispatcher
//! logs them and completes without a file. Callers driving
//! [`HttpClient`](super::HttpClient) or the desktop host directly see them.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DownloadError {
    /// The request never produced a response (DNS, refused connection, TLS).
    #[error("could not fetch {url}: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Connect or read timeout.
    #[error("timed out fetching {url}")]
    Timeout { url: String },

    /// The server answered outside the 2xx range.
    #[error("server answered HTTP {status} for {url}")]
    HttpStatus { url: String, status: u16 },

    /// Writing the saved file (or creating its directory) failed.
    #[error("could not write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Not an absolute URL.
    #[error("invalid URL: {url}")]
    InvalidUrl { url: String },
}

impl DownloadError {
    /// Wraps a transport error. Timeouts become [`DownloadError::Timeout`].
    pub fn network(url: impl Into<String>, source: reqwest::Error) -> Self {
        if source.is_timeout() {
            Self::timeout(url)
        } else {
            Self::Network {
                url: url.into(),
                source,
            }
        }
    }

    pub fn http_status(url: impl Into<String>, status: u16) -> Self {
        Self::HttpStatus {
            url: url.into(),
            status,
        }
    }

    pub fn timeout(url: impl Into<String>) -> Self {
        Self::Timeout { url: url.into() }
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn invalid_url(url: impl Into<String>) -> Self {
        Self::InvalidUrl { url: url.into() }
    }
}

// Every variant carries the url or path its source error lacks, so there are
// no blanket `From` impls.
