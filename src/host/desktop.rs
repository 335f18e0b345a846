//! Native host that saves downloads into a directory.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use dashmap::DashMap;
use tracing::{debug, error, info, warn};

use super::{Anchor, Host, NavigationTarget, ObjectUrl, Popup};
use crate::blob::Blob;
use crate::download::DownloadError;
use crate::download::filename::{resolve_unique_path, with_extension_for};

const OBJECT_URL_PREFIX: &str = "blob:qrsave/";

/// A [`Host`] backed by the local filesystem.
///
/// Clicking an anchor that points at a live object URL writes the blob to
/// the output directory under the anchor's `download` name (made unique with
/// `_1`, `_2`, ... suffixes). The vendor save function writes directly.
/// There are no browsing contexts, so popups, navigation and anchors that
/// target a new context are logged and ignored.
///
/// Pair it with [`HostEnvironment::desktop`](crate::HostEnvironment::desktop).
#[derive(Debug)]
pub struct DesktopHost {
    output_dir: PathBuf,
    object_urls: DashMap<String, Blob>,
    next_id: AtomicU64,
    saved: Mutex<Vec<PathBuf>>,
}

impl DesktopHost {
    /// Creates a host saving into `output_dir` (created on first save).
    #[must_use]
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            object_urls: DashMap::new(),
            next_id: AtomicU64::new(1),
            saved: Mutex::new(Vec::new()),
        }
    }

    /// Directory files are written to.
    #[must_use]
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Paths written so far, in save order.
    #[must_use]
    pub fn saved_paths(&self) -> Vec<PathBuf> {
        self.saved
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of object URLs not yet revoked.
    #[must_use]
    pub fn live_object_urls(&self) -> usize {
        self.object_urls.len()
    }

    async fn write_blob(&self, blob: &Blob, name: &str) -> Result<PathBuf, DownloadError> {
        tokio::fs::create_dir_all(&self.output_dir)
            .await
            .map_err(|e| DownloadError::io(self.output_dir.clone(), e))?;
        let name = with_extension_for(name, blob.content_type());
        let path = resolve_unique_path(&self.output_dir, &name);
        tokio::fs::write(&path, blob.bytes())
            .await
            .map_err(|e| DownloadError::io(path.clone(), e))?;
        Ok(path)
    }

    async fn persist(&self, blob: &Blob, name: &str) {
        match self.write_blob(blob, name).await {
            Ok(path) => {
                info!(path = %path.display(), bytes = blob.len(), "saved file");
                self.saved
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .push(path);
            }
            Err(error) => error!(%error, file_name = name, "could not save file"),
        }
    }
}

#[async_trait]
impl Host for DesktopHost {
    fn create_object_url(&self, blob: &Blob) -> ObjectUrl {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let url = format!("{OBJECT_URL_PREFIX}{id}");
        self.object_urls.insert(url.clone(), blob.clone());
        debug!(url = %url, bytes = blob.len(), "created object URL");
        ObjectUrl::new(url)
    }

    fn revoke_object_url(&self, url: &ObjectUrl) {
        if self.object_urls.remove(url.as_str()).is_some() {
            debug!(url = %url, "revoked object URL");
        }
    }

    async fn click(&self, anchor: Anchor) {
        if anchor.new_context {
            warn!(href = %anchor.href, "cannot open a new browsing context; nothing saved");
            return;
        }
        let blob = self
            .object_urls
            .get(&anchor.href)
            .map(|entry| entry.value().clone());
        match blob {
            Some(blob) => self.persist(&blob, &anchor.download).await,
            None => warn!(
                href = %anchor.href,
                "anchor does not reference a live object URL; nothing saved"
            ),
        }
    }

    async fn vendor_save_blob(&self, blob: Blob, name: &str) {
        self.persist(&blob, name).await;
    }

    fn open_popup(&self) -> Option<Popup> {
        debug!("desktop host has no popups");
        None
    }

    async fn navigate(&self, target: NavigationTarget, url: &str) {
        warn!(?target, url, "cannot navigate a browsing context; nothing saved");
    }
}
