//! The save dispatcher.
//!
//! [`Saver::save`] is the single entry point for saving bytes or a URL as a
//! local file. The strategy is chosen once, when the `Saver` is built, from
//! the host's [`CapabilityProfile`]:
//!
//! - [`AnchorDownload`] - hidden anchor with a `download` attribute
//! - [`VendorBlobSave`] - vendor blob-save function
//! - [`FileReaderFallback`] - data URL or object URL navigation
//! - [`NoOp`] - unsupported environment
//!
//! Saves are best effort: nothing is returned and nothing is raised. Failed
//! fetches are logged and the call completes without a file.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use qrsave_core::{Blob, DesktopHost, HostEnvironment, HttpClient, SaveOptions, Saver};
//!
//! # async fn example() {
//! let host = Arc::new(DesktopHost::new("./downloads"));
//! let saver = Saver::new(&HostEnvironment::desktop(), host.clone(), HttpClient::new());
//!
//! let csv = Blob::new("a,b\n1,2\n", "text/csv;charset=utf-8");
//! saver.save(csv, Some("table.csv"), Some(SaveOptions::with_auto_bom())).await;
//! saver.save("https://example.com/logo.png", None, None).await;
//! println!("saved: {:?}", host.saved_paths());
//! # }
//! ```

mod anchor;
mod context;
mod fallback;
mod noop;
mod strategy;
mod vendor;

pub use anchor::AnchorDownload;
pub use context::SaveContext;
pub use fallback::FileReaderFallback;
pub use noop::NoOp;
pub use strategy::SaveStrategy;
pub use vendor::VendorBlobSave;

use std::sync::Arc;

use tracing::{debug, error, instrument};

use crate::blob::{SaveContent, non_blank};
use crate::bom::SaveOptions;
use crate::capability::{CapabilityProfile, HostEnvironment, StrategyKind};
use crate::download::HttpClient;
use crate::host::Host;

/// Builds the strategy implementation for a selected kind.
#[must_use]
pub fn strategy_for(kind: StrategyKind) -> Box<dyn SaveStrategy> {
    match kind {
        StrategyKind::AnchorDownload => Box::new(AnchorDownload),
        StrategyKind::VendorBlobSave => Box::new(VendorBlobSave),
        StrategyKind::FileReaderFallback => Box::new(FileReaderFallback),
        StrategyKind::NoOp => Box::new(NoOp),
    }
}

/// Saves blobs and URLs as local files through the host's best strategy.
pub struct Saver {
    ctx: SaveContext,
    strategy: Box<dyn SaveStrategy>,
}

impl Saver {
    /// Probes `env` once and binds the selected strategy to `host`.
    #[must_use]
    pub fn new(env: &HostEnvironment, host: Arc<dyn Host>, client: HttpClient) -> Self {
        let profile = CapabilityProfile::detect(env);
        let strategy = strategy_for(profile.strategy());
        debug!(strategy = %strategy.kind(), "saver ready");
        Self {
            ctx: SaveContext::new(host, client, profile),
            strategy,
        }
    }

    /// The capability profile computed at construction.
    #[must_use]
    pub fn profile(&self) -> &CapabilityProfile {
        self.ctx.profile()
    }

    /// The strategy every save goes through.
    #[must_use]
    pub fn strategy_kind(&self) -> StrategyKind {
        self.strategy.kind()
    }

    /// Saves `content` as a local file.
    ///
    /// Strings are URLs: relative ones resolve against the page location,
    /// same-origin ones are downloaded directly, cross-origin ones are probed
    /// and then either fetched and saved or opened in a new browsing context.
    /// Blobs get the BOM step when `options.auto_bom` is set and are then
    /// handed to the strategy.
    ///
    /// A blank `name` counts as missing; blob saves fall back to the blob's
    /// own name and then to [`DEFAULT_FILE_NAME`](crate::DEFAULT_FILE_NAME).
    #[instrument(skip_all, fields(strategy = %self.strategy.kind()))]
    pub async fn save(
        &self,
        content: impl Into<SaveContent>,
        name: Option<&str>,
        options: Option<SaveOptions>,
    ) {
        let options = options.unwrap_or_default();
        let name = non_blank(name);

        match content.into() {
            SaveContent::Url(raw) => {
                let Some(url) = self.ctx.profile().resolve_url(&raw) else {
                    error!(url = %raw, "could not download file: invalid URL");
                    return;
                };
                debug!(url = %url, "saving URL");
                self.strategy.save_url(&self.ctx, url, name, &options).await;
            }
            SaveContent::Blob(blob) => {
                debug!(
                    bytes = blob.len(),
                    content_type = %blob.content_type(),
                    "saving blob"
                );
                let blob = self.ctx.prepare_blob(blob, &options);
                self.strategy.save_blob(&self.ctx, blob, name).await;
            }
        }
    }
}
