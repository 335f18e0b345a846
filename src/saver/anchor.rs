//! Anchor-download strategy: a hidden `<a download>` and a simulated click.

use async_trait::async_trait;
use tracing::debug;
use url::Url;

use super::{SaveContext, SaveStrategy};
use crate::blob::{Blob, DEFAULT_FILE_NAME, file_name_for, non_blank};
use crate::bom::SaveOptions;
use crate::capability::StrategyKind;
use crate::host::Anchor;

/// Saves through an anchor's `download` attribute.
///
/// Same-origin URLs are clicked directly. Cross-origin URLs are probed: a
/// successful probe fetches the bytes and saves them as a blob, a failed
/// one opens the URL in a new browsing context, which can only navigate.
#[derive(Debug, Default, Clone, Copy)]
pub struct AnchorDownload;

#[async_trait]
impl SaveStrategy for AnchorDownload {
    fn kind(&self) -> StrategyKind {
        StrategyKind::AnchorDownload
    }

    #[tracing::instrument(skip(self, ctx, blob), fields(strategy = "anchor-download"))]
    async fn save_blob(&self, ctx: &SaveContext, blob: Blob, name: Option<&str>) {
        let name = file_name_for(name, &blob);
        let object_url = ctx.create_object_url(&blob);
        ctx.host()
            .click(Anchor::download(object_url.as_str(), name))
            .await;
    }

    #[tracing::instrument(skip(self, ctx, options), fields(strategy = "anchor-download"))]
    async fn save_url(
        &self,
        ctx: &SaveContext,
        url: Url,
        name: Option<&str>,
        options: &SaveOptions,
    ) {
        let anchor = Anchor::download(url.as_str(), non_blank(name).unwrap_or(DEFAULT_FILE_NAME));

        if ctx.profile().is_same_origin(&url) {
            debug!("same-origin URL; clicking anchor directly");
            ctx.host().click(anchor).await;
            return;
        }

        if ctx.probe(&url).await {
            if let Some(blob) = ctx.fetch_prepared(&url, options).await {
                self.save_blob(ctx, blob, name).await;
            }
        } else {
            debug!("cross-origin probe failed; opening in a new browsing context");
            ctx.host().click(anchor.in_new_context()).await;
        }
    }
}
