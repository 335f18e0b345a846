//! qrsave Core Library
//!
//! This library provides the core functionality for the qrsave tool: saving
//! byte blobs or remote URLs as local files through whichever download
//! strategy the host environment supports, plus the QR request builder used
//! by the command-line front-end.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//! - [`blob`] - In-memory byte buffers with a MIME type
//! - [`bom`] - Save options and the UTF-8 byte-order-mark adapter
//! - [`capability`] - Host environment description and strategy selection
//! - [`download`] - HTTP probe/fetch client, filenames, errors
//! - [`host`] - Host primitives (object URLs, anchors, popups) and the desktop host
//! - [`qr`] - QR image API request builder
//! - [`saver`] - The save dispatcher and its strategies

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod blob;
pub mod bom;
pub mod capability;
pub mod download;
pub mod host;
pub mod qr;
pub mod saver;
mod user_agent;

// Re-export commonly used types
pub use blob::{Blob, DEFAULT_FILE_NAME, SaveContent};
pub use bom::{SaveOptions, apply_bom};
pub use capability::{
    CapabilityProfile, ExecutionContext, HostEnvironment, StrategyKind, detect_capabilities,
};
pub use download::{DownloadError, HttpClient, OBJECT_URL_REVOKE_DELAY};
pub use host::{Anchor, DesktopHost, Host, NavigationTarget, ObjectUrl, Popup};
pub use qr::{ImageFormat, QrError, QrRequest};
pub use saver::Saver;
