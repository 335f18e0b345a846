//! Host environment description and download-strategy selection.
//!
//! The host's capabilities are described explicitly by a [`HostEnvironment`]
//! and turned into a [`StrategyKind`] by the pure [`detect_capabilities`]
//! function. A [`CapabilityProfile`] bundles that choice with the derived
//! user-agent flags the fallback strategy needs; it is computed once per
//! [`Saver`](crate::Saver) and never refreshed.
//!
//! The user-agent heuristics are best effort. Exotic browsers may be
//! misclassified; that is accepted rather than patched around.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;
use url::Url;

/// Chrome on iOS identifies itself with `CriOS/<major>`.
#[allow(clippy::expect_used)]
static CHROME_IOS_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"CriOS/\d+").expect("CriOS regex is valid") // Static pattern, safe to panic
});

/// Kind of execution context the saver runs in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionContext {
    /// A regular windowed page (or a native host acting like one).
    Window,
    /// A background worker with no document.
    Worker,
    /// Anything else (server-side, unknown globals).
    Other,
}

impl ExecutionContext {
    /// Only windowed contexts can trigger downloads.
    #[must_use]
    pub fn is_windowed(self) -> bool {
        matches!(self, Self::Window)
    }
}

/// Explicit description of what the host environment provides.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostEnvironment {
    /// Execution context kind.
    pub context: ExecutionContext,
    /// Anchors support the `download` attribute.
    pub has_download_attribute: bool,
    /// A vendor "save blob" function exists.
    pub has_vendor_blob_save: bool,
    /// A FileReader-equivalent (blob to data URL) exists.
    pub has_file_reader: bool,
    /// New blobs can be constructed (needed to prepend a BOM).
    pub has_blob_constructor: bool,
    /// Vendor-specific Safari marker was observed.
    pub safari_hint: bool,
    /// The host's user-agent string.
    pub user_agent: String,
    /// Current page location, used for same-origin decisions.
    pub location: Option<Url>,
}

impl HostEnvironment {
    /// A windowed environment with nothing download-capable.
    #[must_use]
    pub fn bare_window(user_agent: impl Into<String>) -> Self {
        Self {
            context: ExecutionContext::Window,
            has_download_attribute: false,
            has_vendor_blob_save: false,
            has_file_reader: false,
            has_blob_constructor: true,
            safari_hint: false,
            user_agent: user_agent.into(),
            location: None,
        }
    }

    /// The environment offered by [`DesktopHost`](crate::DesktopHost).
    ///
    /// It has no page location, so every URL is treated as cross-origin.
    #[must_use]
    pub fn desktop() -> Self {
        Self {
            has_download_attribute: true,
            has_file_reader: true,
            ..Self::bare_window(crate::user_agent::default_user_agent())
        }
    }
}

/// The four ways a save can be carried out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrategyKind {
    /// Simulated click on a hidden anchor with a `download` attribute.
    AnchorDownload,
    /// Vendor blob-save function.
    VendorBlobSave,
    /// FileReader data URL or object URL navigation, via a popup if possible.
    FileReaderFallback,
    /// Unsupported environment; saves do nothing.
    NoOp,
}

impl StrategyKind {
    /// Stable label for logs.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::AnchorDownload => "anchor-download",
            Self::VendorBlobSave => "vendor-blob-save",
            Self::FileReaderFallback => "file-reader-fallback",
            Self::NoOp => "no-op",
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

type SelectionRule = (fn(&HostEnvironment) -> bool, StrategyKind);

/// Ordered selection rules; the first matching predicate wins.
const SELECTION_RULES: [SelectionRule; 4] = [
    (|env| !env.context.is_windowed(), StrategyKind::NoOp),
    (
        |env| env.has_download_attribute && !is_embedded_webview(&env.user_agent),
        StrategyKind::AnchorDownload,
    ),
    (|env| env.has_vendor_blob_save, StrategyKind::VendorBlobSave),
    (|_| true, StrategyKind::FileReaderFallback),
];

/// Selects the download strategy for an environment.
#[must_use]
pub fn detect_capabilities(env: &HostEnvironment) -> StrategyKind {
    SELECTION_RULES
        .iter()
        .find(|(applies, _)| applies(env))
        .map_or(StrategyKind::FileReaderFallback, |(_, kind)| *kind)
}

/// True for a web view embedded in a native macOS app: WebKit on a Mac, but
/// without the `Safari` token the real browser sends.
#[must_use]
pub fn is_embedded_webview(user_agent: &str) -> bool {
    user_agent.contains("Macintosh")
        && user_agent.contains("AppleWebKit")
        && !user_agent.contains("Safari")
}

/// True for Chrome on iOS.
#[must_use]
pub fn is_chrome_ios(user_agent: &str) -> bool {
    CHROME_IOS_PATTERN.is_match(user_agent)
}

/// Capabilities computed once from a [`HostEnvironment`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapabilityProfile {
    strategy: StrategyKind,
    embedded_webview: bool,
    chrome_ios: bool,
    safari: bool,
    file_reader: bool,
    blob_constructor: bool,
    location: Option<Url>,
}

impl CapabilityProfile {
    /// Probes the environment.
    #[must_use]
    pub fn detect(env: &HostEnvironment) -> Self {
        let profile = Self {
            strategy: detect_capabilities(env),
            embedded_webview: is_embedded_webview(&env.user_agent),
            chrome_ios: is_chrome_ios(&env.user_agent),
            safari: env.safari_hint,
            file_reader: env.has_file_reader,
            blob_constructor: env.has_blob_constructor,
            location: env.location.clone(),
        };
        debug!(
            strategy = %profile.strategy,
            embedded_webview = profile.embedded_webview,
            chrome_ios = profile.chrome_ios,
            safari = profile.safari,
            "capability profile detected"
        );
        profile
    }

    /// The selected strategy.
    #[must_use]
    pub fn strategy(&self) -> StrategyKind {
        self.strategy
    }

    #[must_use]
    pub fn is_embedded_webview(&self) -> bool {
        self.embedded_webview
    }

    #[must_use]
    pub fn is_chrome_ios(&self) -> bool {
        self.chrome_ios
    }

    #[must_use]
    pub fn is_safari(&self) -> bool {
        self.safari
    }

    #[must_use]
    pub fn has_file_reader(&self) -> bool {
        self.file_reader
    }

    #[must_use]
    pub fn has_blob_constructor(&self) -> bool {
        self.blob_constructor
    }

    /// Current page location, if the host has one.
    #[must_use]
    pub fn location(&self) -> Option<&Url> {
        self.location.as_ref()
    }

    /// Resolves `url` against the page location (or parses it as absolute).
    #[must_use]
    pub fn resolve_url(&self, url: &str) -> Option<Url> {
        match &self.location {
            Some(base) => base.join(url).ok(),
            None => Url::parse(url).ok(),
        }
    }

    /// True if `url` shares the page's origin. Without a page location
    /// nothing is same-origin.
    #[must_use]
    pub fn is_same_origin(&self, url: &Url) -> bool {
        self.location
            .as_ref()
            .is_some_and(|page| page.origin() == url.origin())
    }
}
