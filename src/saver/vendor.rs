//! Vendor blob-save strategy.

use async_trait::async_trait;
use tracing::debug;
use url::Url;

use super::{SaveContext, SaveStrategy};
use crate::blob::{Blob, DEFAULT_FILE_NAME, file_name_for, non_blank};
use crate::bom::SaveOptions;
use crate::capability::StrategyKind;
use crate::host::Anchor;

/// Saves through the host's vendor blob-save function.
///
/// URLs are probed first; when the probe fails they open in a new browsing
/// context instead.
#[derive(Debug, Default, Clone, Copy)]
pub struct VendorBlobSave;

#[async_trait]
impl SaveStrategy for VendorBlobSave {
    fn kind(&self) -> StrategyKind {
        StrategyKind::VendorBlobSave
    }

    #[tracing::instrument(skip(self, ctx, blob), fields(strategy = "vendor-blob-save"))]
    async fn save_blob(&self, ctx: &SaveContext, blob: Blob, name: Option<&str>) {
        let name = file_name_for(name, &blob);
        ctx.host().vendor_save_blob(blob, &name).await;
    }

    #[tracing::instrument(skip(self, ctx, options), fields(strategy = "vendor-blob-save"))]
    async fn save_url(
        &self,
        ctx: &SaveContext,
        url: Url,
        name: Option<&str>,
        options: &SaveOptions,
    ) {
        if ctx.probe(&url).await {
            if let Some(blob) = ctx.fetch_prepared(&url, options).await {
                self.save_blob(ctx, blob, name).await;
            }
        } else {
            debug!("probe failed; opening in a new browsing context");
            let name = non_blank(name).unwrap_or(DEFAULT_FILE_NAME);
            ctx.host()
                .click(Anchor::download(url.as_str(), name).in_new_context())
                .await;
        }
    }
}
