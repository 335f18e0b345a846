//! Constants for the download module (timeouts, object URL lifetime).

use std::time::Duration;

/// Default HTTP connect timeout (30 seconds).
pub const CONNECT_TIMEOUT_SECS: u64 = 30;

/// Default HTTP read timeout (5 minutes for large files).
pub const READ_TIMEOUT_SECS: u64 = 300;

/// How long an object URL stays alive after creation. Long enough for the
/// host to start reading the blob, short enough not to pin it in memory.
pub const OBJECT_URL_REVOKE_DELAY: Duration = Duration::from_secs(40);
