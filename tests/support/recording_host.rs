//! A spy [`Host`] that records every primitive the save strategies invoke.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use qrsave_core::{Anchor, Blob, Host, NavigationTarget, ObjectUrl, Popup};

/// Where a recorded navigation went.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    Popup(u64),
    CurrentContext,
    NewContext,
}

impl From<NavigationTarget> for Target {
    fn from(target: NavigationTarget) -> Self {
        match target {
            NavigationTarget::Popup(popup) => Self::Popup(popup.id()),
            NavigationTarget::CurrentContext => Self::CurrentContext,
            NavigationTarget::NewContext => Self::NewContext,
        }
    }
}

/// One host interaction, in call order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostEvent {
    CreateObjectUrl(String),
    RevokeObjectUrl(String),
    Click(Anchor),
    VendorSave { name: String, blob: Blob },
    OpenPopup(Option<u64>),
    Navigate { target: Target, url: String },
}

#[derive(Debug, Default)]
pub struct RecordingHost {
    popups_allowed: bool,
    events: Mutex<Vec<HostEvent>>,
    object_urls: Mutex<HashMap<String, Blob>>,
    next_id: AtomicU64,
}

#[allow(dead_code)]
impl RecordingHost {
    /// A host whose popups are blocked.
    pub fn new() -> Self {
        Self::default()
    }

    /// A host that hands out popups.
    pub fn with_popups() -> Self {
        Self {
            popups_allowed: true,
            ..Self::default()
        }
    }

    fn record(&self, event: HostEvent) {
        self.events.lock().unwrap().push(event);
    }

    pub fn events(&self) -> Vec<HostEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn clicks(&self) -> Vec<Anchor> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                HostEvent::Click(anchor) => Some(anchor),
                _ => None,
            })
            .collect()
    }

    pub fn vendor_saves(&self) -> Vec<(String, Blob)> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                HostEvent::VendorSave { name, blob } => Some((name, blob)),
                _ => None,
            })
            .collect()
    }

    pub fn navigations(&self) -> Vec<(Target, String)> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                HostEvent::Navigate { target, url } => Some((target, url)),
                _ => None,
            })
            .collect()
    }

    pub fn revoked(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                HostEvent::RevokeObjectUrl(url) => Some(url),
                _ => None,
            })
            .collect()
    }

    /// The blob registered under an object URL, if it was ever created.
    pub fn blob_for(&self, url: &str) -> Option<Blob> {
        self.object_urls.lock().unwrap().get(url).cloned()
    }
}

#[async_trait]
impl Host for RecordingHost {
    fn create_object_url(&self, blob: &Blob) -> ObjectUrl {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let url = format!("blob:test/{id}");
        self.object_urls
            .lock()
            .unwrap()
            .insert(url.clone(), blob.clone());
        self.record(HostEvent::CreateObjectUrl(url.clone()));
        ObjectUrl::new(url)
    }

    fn revoke_object_url(&self, url: &ObjectUrl) {
        self.record(HostEvent::RevokeObjectUrl(url.to_string()));
    }

    async fn click(&self, anchor: Anchor) {
        self.record(HostEvent::Click(anchor));
    }

    async fn vendor_save_blob(&self, blob: Blob, name: &str) {
        self.record(HostEvent::VendorSave {
            name: name.to_string(),
            blob,
        });
    }

    fn open_popup(&self) -> Option<Popup> {
        let popup = self
            .popups_allowed
            .then(|| Popup::new(100 + self.next_id.fetch_add(1, Ordering::Relaxed)));
        self.record(HostEvent::OpenPopup(popup.as_ref().map(Popup::id)));
        popup
    }

    async fn navigate(&self, target: NavigationTarget, url: &str) {
        self.record(HostEvent::Navigate {
            target: target.into(),
            url: url.to_string(),
        });
    }
}
