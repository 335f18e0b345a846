//! Shared helpers for integration tests.

#![allow(dead_code)]

pub mod recording_host;

use qrsave_core::{ExecutionContext, HostEnvironment};
use url::Url;

pub const DESKTOP_CHROME_UA: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0 Safari/537.36";
pub const CHROME_IOS_UA: &str = "Mozilla/5.0 (iPhone; CPU iPhone OS 17_0 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) CriOS/120.0 Mobile/15E148 Safari/604.1";
pub const EMBEDDED_WEBVIEW_UA: &str =
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko)";

/// A browser with anchor downloads, served from `location`.
pub fn anchor_env(location: &str) -> HostEnvironment {
    HostEnvironment {
        has_download_attribute: true,
        has_file_reader: true,
        location: Some(Url::parse(location).unwrap()),
        ..HostEnvironment::bare_window(DESKTOP_CHROME_UA)
    }
}

/// A browser offering only the vendor blob-save function.
pub fn vendor_env() -> HostEnvironment {
    HostEnvironment {
        has_vendor_blob_save: true,
        ..HostEnvironment::bare_window("Mozilla/5.0 (Windows NT 10.0; Trident/7.0; rv:11.0) like Gecko")
    }
}

/// A browser with neither anchor downloads nor vendor save.
pub fn fallback_env(user_agent: &str) -> HostEnvironment {
    HostEnvironment {
        has_file_reader: true,
        ..HostEnvironment::bare_window(user_agent)
    }
}

/// A background worker.
pub fn worker_env() -> HostEnvironment {
    HostEnvironment {
        context: ExecutionContext::Worker,
        has_download_attribute: true,
        ..HostEnvironment::bare_window(DESKTOP_CHROME_UA)
    }
}
