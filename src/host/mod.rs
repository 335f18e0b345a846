//! Host primitives the save strategies are built from.
//!
//! A [`Host`] is whatever actually materializes a download: a browser page
//! (object URLs, a hidden anchor, popups) or the native [`DesktopHost`],
//! which writes files into a directory. Strategies only talk to the host
//! through this trait, so tests substitute recording hosts.

mod desktop;

pub use desktop::DesktopHost;

use std::fmt;

use async_trait::async_trait;

use crate::blob::Blob;

/// A host-issued URL referencing a blob's bytes without a network round-trip.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ObjectUrl(String);

impl ObjectUrl {
    /// Wraps a host-generated URL.
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self(url.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ObjectUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A hidden anchor element used to trigger a download by simulated click.
///
/// Anchors always carry `rel="noopener"` so an opened page cannot reach back
/// into the opener.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Anchor {
    /// Target URL (object URL or remote URL).
    pub href: String,
    /// Value of the `download` attribute.
    pub download: String,
    /// Open in a new browsing context (`target="_blank"`).
    pub new_context: bool,
}

impl Anchor {
    /// An anchor that downloads `href` as `name` in the current context.
    #[must_use]
    pub fn download(href: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            href: href.into(),
            download: name.into(),
            new_context: false,
        }
    }

    /// Same anchor, opened in a new browsing context.
    #[must_use]
    pub fn in_new_context(mut self) -> Self {
        self.new_context = true;
        self
    }

    /// Always `noopener`.
    #[must_use]
    pub fn rel(&self) -> &'static str {
        "noopener"
    }
}

/// Handle to a pre-opened popup window.
///
/// The handle is a single-use token: it is not `Clone`, and navigating it
/// consumes it. Holders keep it in an `Option` and `take()` it on use, so a
/// late continuation cannot redirect a popup that was already used.
#[derive(Debug, PartialEq, Eq)]
pub struct Popup {
    id: u64,
}

impl Popup {
    /// Wraps a host-specific popup identifier.
    #[must_use]
    pub fn new(id: u64) -> Self {
        Self { id }
    }

    #[must_use]
    pub fn id(&self) -> u64 {
        self.id
    }
}

/// Where a navigation goes.
#[derive(Debug, PartialEq, Eq)]
pub enum NavigationTarget {
    /// A pre-opened popup (consumed).
    Popup(Popup),
    /// The current browsing context.
    CurrentContext,
    /// A fresh browsing context.
    NewContext,
}

impl NavigationTarget {
    /// Navigates the popup if one is held, otherwise `fallback`. The slot is
    /// emptied either way.
    pub fn popup_or(slot: &mut Option<Popup>, fallback: Self) -> Self {
        slot.take().map_or(fallback, Self::Popup)
    }
}

/// Download primitives offered by the host environment.
///
/// None of these report failure to the caller: like their browser
/// counterparts, they either take effect or are logged by the host.
#[async_trait]
pub trait Host: Send + Sync {
    /// Registers the blob under a fresh object URL.
    fn create_object_url(&self, blob: &Blob) -> ObjectUrl;

    /// Releases an object URL. Unknown URLs are ignored.
    fn revoke_object_url(&self, url: &ObjectUrl);

    /// Simulates a user click on a hidden anchor.
    async fn click(&self, anchor: Anchor);

    /// Hands a blob to the vendor save function.
    async fn vendor_save_blob(&self, blob: Blob, name: &str);

    /// Opens an empty popup showing a "downloading..." placeholder, if the
    /// host allows popups.
    fn open_popup(&self) -> Option<Popup>;

    /// Navigates a browsing context to `url`.
    async fn navigate(&self, target: NavigationTarget, url: &str);
}
