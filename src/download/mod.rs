//! HTTP plumbing for the save dispatcher.
//!
//! This module provides the same-origin probe and the GET-then-save fetch
//! used when a URL has to be turned into a blob, plus the filename helpers
//! shared with the desktop host.
//!
//! # Example
//!
//! ```no_run
//! use qrsave_core::download::HttpClient;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = HttpClient::new();
//! if client.probe("https://example.com/qr.png").await {
//!     let blob = client.fetch_blob("https://example.com/qr.png").await?;
//!     println!("fetched {} bytes of {}", blob.len(), blob.content_type());
//! }
//! # Ok(())
//! # }
//! ```

mod client;
mod constants;
mod error;
pub(crate) mod filename;

pub use client::HttpClient;
pub use constants::{CONNECT_TIMEOUT_SECS, OBJECT_URL_REVOKE_DELAY, READ_TIMEOUT_SECS};
pub use error::DownloadError;

// No module-local Result alias: use `Result<T, DownloadError>` explicitly.
