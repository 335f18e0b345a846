use async_trait::async_trait;
use tracing::debug;
use url::Url;

use super::{SaveContext, SaveStrategy};
use crate::blob::Blob;
use crate::bom::SaveOptions;
use crate::capability::StrategyKind;

/// Strategy for environments that cannot download at all (e.g. workers).
/// Every save completes without touching the host or the network.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOp;

#[async_trait]
impl SaveStrategy for NoOp {
    fn kind(&self) -> StrategyKind {
        StrategyKind::NoOp
    }

    async fn save_blob(&self, _ctx: &SaveContext, blob: Blob, _name: Option<&str>) {
        debug!(bytes = blob.len(), "no download strategy available; ignoring blob");
    }

    async fn save_url(
        &self,
        _ctx: &SaveContext,
        url: Url,
        _name: Option<&str>,
        _options: &SaveOptions,
    ) {
        debug!(url = %url, "no download strategy available; ignoring URL");
    }
}
