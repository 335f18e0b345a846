use async_trait::async_trait;
use url::Url;

use super::SaveContext;
use crate::blob::Blob;
use crate::bom::SaveOptions;
use crate::capability::StrategyKind;

/// A way of turning bytes or a URL into a local file.
///
/// # Object Safety
///
/// This trait uses `async_trait` so the dispatcher can hold the selected
/// strategy as `Box<dyn SaveStrategy>`.
#[async_trait]
pub trait SaveStrategy: Send + Sync {
    /// Which strategy this is.
    fn kind(&self) -> StrategyKind;

    /// Saves an already-prepared blob (BOM step done).
    async fn save_blob(&self, ctx: &SaveContext, blob: Blob, name: Option<&str>);

    /// Saves an absolute URL. `options` apply to the blob if it gets fetched.
    async fn save_url(
        &self,
        ctx: &SaveContext,
        url: Url,
        name: Option<&str>,
        options: &SaveOptions,
    );
}
