//! Shared state and helpers the strategies run against.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, error, warn};
use url::Url;

use crate::blob::Blob;
use crate::bom::{SaveOptions, apply_bom, wants_bom};
use crate::capability::CapabilityProfile;
use crate::download::{HttpClient, OBJECT_URL_REVOKE_DELAY};
use crate::host::{Host, ObjectUrl};

/// Everything a [`SaveStrategy`](super::SaveStrategy) needs: the host, the
/// HTTP client, and the capability profile.
pub struct SaveContext {
    host: Arc<dyn Host>,
    client: HttpClient,
    profile: CapabilityProfile,
    revoke_delay: Duration,
}

impl SaveContext {
    pub(crate) fn new(host: Arc<dyn Host>, client: HttpClient, profile: CapabilityProfile) -> Self {
        Self {
            host,
            client,
            profile,
            revoke_delay: OBJECT_URL_REVOKE_DELAY,
        }
    }

    #[must_use]
    pub fn host(&self) -> &dyn Host {
        self.host.as_ref()
    }

    #[must_use]
    pub fn profile(&self) -> &CapabilityProfile {
        &self.profile
    }

    /// Applies the BOM step. Hosts that cannot construct blobs keep the
    /// original bytes.
    #[must_use]
    pub fn prepare_blob(&self, blob: Blob, options: &SaveOptions) -> Blob {
        if options.auto_bom && !self.profile.has_blob_constructor() {
            if wants_bom(blob.content_type()) {
                warn!("host cannot construct blobs; saving without BOM");
            }
            return blob;
        }
        apply_bom(blob, options)
    }

    /// Same-origin/CORS probe.
    pub async fn probe(&self, url: &Url) -> bool {
        self.client.probe(url.as_str()).await
    }

    /// GET-then-save, first half: fetches `url` and prepares the blob.
    ///
    /// Failures are logged and yield `None`; there is no retry.
    pub async fn fetch_prepared(&self, url: &Url, options: &SaveOptions) -> Option<Blob> {
        match self.client.fetch_blob(url.as_str()).await {
            Ok(blob) => Some(self.prepare_blob(blob, options)),
            Err(error) => {
                error!(url = %url, %error, "could not download file");
                None
            }
        }
    }

    /// Creates an object URL and schedules its release after the grace
    /// period. The creator owns the release; there is no reference counting.
    pub fn create_object_url(&self, blob: &Blob) -> ObjectUrl {
        let url = self.host.create_object_url(blob);
        let host = Arc::clone(&self.host);
        let delay = self.revoke_delay;
        let scheduled = url.clone();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            host.revoke_object_url(&scheduled);
            debug!(url = %scheduled, "object URL released");
        });
        url
    }
}
