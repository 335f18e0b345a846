//! FileReader / popup fallback strategy.
//!
//! Used when the host has neither a usable `download` attribute nor a vendor
//! save function. The blob is turned into a URL (a `data:` URL via the
//! FileReader path, or an object URL) and a browsing context is navigated to
//! it. Navigations cannot carry a filename, so names are ignored here.
//!
//! A popup is opened before any asynchronous work so popup blockers still see
//! it as part of the user's gesture. It is held as a single-use token and
//! consumed by the first navigation.

use async_trait::async_trait;
use tracing::{debug, error};
use url::Url;

use super::{SaveContext, SaveStrategy};
use crate::blob::{Blob, as_attachment_data_url};
use crate::bom::SaveOptions;
use crate::capability::StrategyKind;
use crate::host::{NavigationTarget, Popup};

#[derive(Debug, Default, Clone, Copy)]
pub struct FileReaderFallback;

impl FileReaderFallback {
    async fn save_blob_into(&self, ctx: &SaveContext, blob: Blob, popup: &mut Option<Popup>) {
        let profile = ctx.profile();
        let force = blob.is_octet_stream();
        let use_reader = (profile.is_chrome_ios()
            || (force && profile.is_safari())
            || profile.is_embedded_webview())
            && profile.has_file_reader();

        if use_reader {
            debug!(force, "converting blob to a data URL");
            let data_url = match tokio::task::spawn_blocking(move || blob.to_data_url()).await {
                Ok(data_url) => data_url,
                Err(error) => {
                    error!(%error, "could not read blob as a data URL");
                    return;
                }
            };
            let url = if profile.is_chrome_ios() {
                data_url
            } else {
                as_attachment_data_url(&data_url)
            };
            let target = NavigationTarget::popup_or(popup, NavigationTarget::CurrentContext);
            ctx.host().navigate(target, &url).await;
        } else {
            let object_url = ctx.create_object_url(&blob);
            let target = NavigationTarget::popup_or(popup, NavigationTarget::CurrentContext);
            ctx.host().navigate(target, object_url.as_str()).await;
        }
    }
}

#[async_trait]
impl SaveStrategy for FileReaderFallback {
    fn kind(&self) -> StrategyKind {
        StrategyKind::FileReaderFallback
    }

    #[tracing::instrument(skip(self, ctx, blob), fields(strategy = "file-reader-fallback"))]
    async fn save_blob(&self, ctx: &SaveContext, blob: Blob, _name: Option<&str>) {
        let mut popup = ctx.host().open_popup();
        self.save_blob_into(ctx, blob, &mut popup).await;
    }

    #[tracing::instrument(skip(self, ctx, options), fields(strategy = "file-reader-fallback"))]
    async fn save_url(
        &self,
        ctx: &SaveContext,
        url: Url,
        _name: Option<&str>,
        options: &SaveOptions,
    ) {
        let mut popup = ctx.host().open_popup();

        if ctx.probe(&url).await {
            if let Some(blob) = ctx.fetch_prepared(&url, options).await {
                self.save_blob_into(ctx, blob, &mut popup).await;
            }
        } else {
            debug!("probe failed; navigating to the URL instead");
            let target = NavigationTarget::popup_or(&mut popup, NavigationTarget::NewContext);
            ctx.host().navigate(target, url.as_str()).await;
        }
    }
}
