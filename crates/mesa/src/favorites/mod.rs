//! Favorites store
//!
//! Keeps the in-memory favorites collection and persists every change to the
//! backend chosen for the current identity:
//!
//! | Identity      | Cloud configured | Backend                                  |
//! |---------------|------------------|------------------------------------------|
//! | anonymous     | any              | local device store                       |
//! | authenticated | no               | local device store                       |
//! | authenticated | yes              | cloud store (local fallback on load only) |
//!
//! Write failures are surfaced to the caller and leave the collection unchanged.

pub mod backend;
pub mod locks;

#[cfg(test)]
mod pbt_test;

use chrono::Utc;
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_stream::StreamExt;
use tracing::{debug, error, info, warn};

use mesa_api::{Favorite, Identity, PersistenceError, Place};
use mesa_core::constants::{DEFAULT_FAVORITES_KEY, DEFAULT_PHOTO_MAX_WIDTH};
use mesa_core::{CloudDocumentStore, IdentityProvider, LocalDeviceStore, SearchGateway};

pub use backend::{BackendKind, CloudBackend, FavoritesBackend, LocalBackend};
pub use locks::KeyedLocks;

/// Outcome of the most recent operations, for presentation layers.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FavoritesStatus {
    /// Backend that served the last completed load
    pub backend: Option<BackendKind>,
    /// Message of the last recovered or surfaced failure
    pub last_error: Option<String>,
}

pub struct FavoritesStoreBuilder {
    identity: Arc<dyn IdentityProvider>,
    local_store: Arc<dyn LocalDeviceStore>,
    cloud: Option<Arc<dyn CloudDocumentStore>>,
    photos: Option<Arc<dyn SearchGateway>>,
    favorites_key: String,
}

impl FavoritesStoreBuilder {
    /// Cloud store used for signed-in users. Without one every operation is local.
    pub fn cloud(mut self, cloud: Arc<dyn CloudDocumentStore>) -> Self {
        self.cloud = Some(cloud);
        self
    }

    pub fn maybe_cloud(mut self, cloud: Option<Arc<dyn CloudDocumentStore>>) -> Self {
        self.cloud = cloud;
        self
    }

    /// Gateway used to resolve the snapshot photo URL of cloud records.
    pub fn photo_resolver(mut self, gateway: Arc<dyn SearchGateway>) -> Self {
        self.photos = Some(gateway);
        self
    }

    pub fn favorites_key(mut self, key: impl Into<String>) -> Self {
        self.favorites_key = key.into();
        self
    }

    pub fn build(self) -> Arc<FavoritesStore> {
        let (favorites, _) = watch::channel(Vec::new());
        Arc::new(FavoritesStore {
            identity: self.identity,
            cloud: self.cloud,
            local: Arc::new(LocalBackend::new(self.local_store, self.favorites_key)),
            photos: self.photos,
            favorites,
            status: Mutex::new(FavoritesStatus::default()),
            locks: KeyedLocks::new(),
            generation: AtomicU64::new(0),
        })
    }
}

pub struct FavoritesStore {
    identity: Arc<dyn IdentityProvider>,
    cloud: Option<Arc<dyn CloudDocumentStore>>,
    local: Arc<LocalBackend>,
    photos: Option<Arc<dyn SearchGateway>>,
    /// Newest first; place ids are unique
    favorites: watch::Sender<Vec<Favorite>>,
    status: Mutex<FavoritesStatus>,
    locks: KeyedLocks,
    /// Incremented by every load; only the latest load may publish
    generation: AtomicU64,
}

impl FavoritesStore {
    pub fn builder(
        identity: Arc<dyn IdentityProvider>,
        local_store: Arc<dyn LocalDeviceStore>,
    ) -> FavoritesStoreBuilder {
        FavoritesStoreBuilder {
            identity,
            local_store,
            cloud: None,
            photos: None,
            favorites_key: DEFAULT_FAVORITES_KEY.to_string(),
        }
    }

    pub fn is_cloud_configured(&self) -> bool {
        self.cloud.is_some()
    }

    fn status_lock(&self) -> MutexGuard<'_, FavoritesStatus> {
        self.status
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn record_error(&self, error: &PersistenceError) {
        self.status_lock().last_error = Some(error.to_string());
    }

    fn backend_for(&self, identity: &Identity) -> Arc<dyn FavoritesBackend> {
        match (identity.uid(), &self.cloud) {
            (Some(uid), Some(cloud)) => {
                Arc::new(CloudBackend::new(Arc::clone(cloud), uid)) as Arc<dyn FavoritesBackend>
            }
            _ => Arc::clone(&self.local) as Arc<dyn FavoritesBackend>,
        }
    }

    /// Read the local array, treating an undecodable payload as empty.
    fn load_local(&self) -> (Vec<Favorite>, Option<String>) {
        match self.local.read() {
            Ok(favorites) => (favorites, None),
            Err(e) => {
                warn!("[FavoritesStore] Local favorites unreadable: {}", e);
                (Vec::new(), Some(e.to_string()))
            }
        }
    }

    /// Replace the collection from the backend chosen for the current identity.
    ///
    /// Never fails: a cloud read failure falls back to the local array and an
    /// unreadable local array loads as empty. Both are recorded in `status()`.
    /// When a newer load starts before this one resolves, this one returns the
    /// current collection without publishing its own result.
    #[tracing::instrument(skip(self))]
    pub async fn load(&self) -> Vec<Favorite> {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let identity = self.identity.current_identity();
        let backend = self.backend_for(&identity);

        let (favorites, served_by, failure) = match backend.kind() {
            BackendKind::Cloud => match backend.list().await {
                Ok(favorites) => (favorites, BackendKind::Cloud, None),
                Err(e) => {
                    warn!(
                        "[FavoritesStore] Cloud load failed, using local favorites: {}",
                        e
                    );
                    let (local, _) = self.load_local();
                    (local, BackendKind::Local, Some(e.to_string()))
                }
            },
            BackendKind::Local => {
                let (local, failure) = self.load_local();
                (local, BackendKind::Local, failure)
            }
        };

        let mut status = self.status_lock();
        if self.generation.load(Ordering::SeqCst) != generation {
            debug!("[FavoritesStore] Load {} superseded, discarding", generation);
            return self.favorites();
        }
        info!(
            "[FavoritesStore] Loaded {} favorites from {:?} backend",
            favorites.len(),
            served_by
        );
        status.backend = Some(served_by);
        status.last_error = failure;
        self.favorites.send_replace(favorites.clone());
        favorites
    }

    /// Record built for `place` on the given backend.
    fn record_for(&self, place: &Place, kind: BackendKind) -> Favorite {
        let data = match kind {
            BackendKind::Local => place.clone(),
            BackendKind::Cloud => {
                let photo_url = match (&self.photos, place.primary_photo()) {
                    (Some(photos), Some(photo)) => Some(
                        photos.resolve_photo_url(&photo.photo_reference, DEFAULT_PHOTO_MAX_WIDTH),
                    ),
                    _ => None,
                };
                place.snapshot(photo_url)
            }
        };
        Favorite::new(data, Utc::now())
    }

    async fn add_locked(&self, place: &Place) -> Result<(), PersistenceError> {
        if self.contains(&place.place_id) {
            debug!("[FavoritesStore] {} is already a favorite", place.place_id);
            return Ok(());
        }

        let backend = self.backend_for(&self.identity.current_identity());
        let record = self.record_for(place, backend.kind());
        if let Err(e) = backend.save(&record).await {
            error!(
                "[FavoritesStore] Failed to save {} to {:?} backend: {}",
                place.place_id,
                backend.kind(),
                e
            );
            self.record_error(&e);
            return Err(e);
        }

        self.favorites.send_modify(|favorites| {
            if !favorites.iter().any(|f| f.place_id == record.place_id) {
                favorites.insert(0, record);
            }
        });
        info!("[FavoritesStore] Added {} ({:?})", place.place_id, backend.kind());
        Ok(())
    }

    async fn remove_locked(&self, place_id: &str) -> Result<(), PersistenceError> {
        let backend = self.backend_for(&self.identity.current_identity());
        if let Err(e) = backend.delete(place_id).await {
            error!(
                "[FavoritesStore] Failed to remove {} from {:?} backend: {}",
                place_id,
                backend.kind(),
                e
            );
            self.record_error(&e);
            return Err(e);
        }

        self.favorites.send_if_modified(|favorites| {
            let before = favorites.len();
            favorites.retain(|f| f.place_id != place_id);
            favorites.len() != before
        });
        info!("[FavoritesStore] Removed {} ({:?})", place_id, backend.kind());
        Ok(())
    }

    /// Persist `place` as a favorite and prepend it. No-op when already present.
    #[tracing::instrument(skip(self, place), fields(place_id = %place.place_id))]
    pub async fn add(&self, place: &Place) -> Result<(), PersistenceError> {
        let _guard = self.locks.lock(&place.place_id).await;
        self.add_locked(place).await
    }

    /// Delete the favorite for `place_id`. Removing an absent favorite succeeds.
    #[tracing::instrument(skip(self))]
    pub async fn remove(&self, place_id: &str) -> Result<(), PersistenceError> {
        let _guard = self.locks.lock(place_id).await;
        self.remove_locked(place_id).await
    }

    /// Flip membership of `place`. Returns whether it is a favorite afterwards.
    ///
    /// Concurrent toggles of the same place run one after the other, each
    /// observing the membership the previous one left.
    #[tracing::instrument(skip(self, place), fields(place_id = %place.place_id))]
    pub async fn toggle(&self, place: &Place) -> Result<bool, PersistenceError> {
        let _guard = self.locks.lock(&place.place_id).await;
        if self.contains(&place.place_id) {
            self.remove_locked(&place.place_id).await?;
            Ok(false)
        } else {
            self.add_locked(place).await?;
            Ok(true)
        }
    }

    pub fn contains(&self, place_id: &str) -> bool {
        self.favorites
            .borrow()
            .iter()
            .any(|f| f.place_id == place_id)
    }

    pub fn favorites(&self) -> Vec<Favorite> {
        self.favorites.borrow().clone()
    }

    /// Saved place snapshots, newest first.
    pub fn places(&self) -> Vec<Place> {
        self.favorites
            .borrow()
            .iter()
            .map(|f| f.place_data.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.favorites.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn status(&self) -> FavoritesStatus {
        self.status_lock().clone()
    }

    /// Receiver notified whenever the collection changes.
    pub fn subscribe(&self) -> watch::Receiver<Vec<Favorite>> {
        self.favorites.subscribe()
    }

    /// Reload on every identity the provider reports, starting with the current one.
    ///
    /// The task ends when the identity stream ends; abort the handle to stop it earlier.
    pub fn spawn_identity_watcher(self: &Arc<Self>) -> JoinHandle<()> {
        let store = Arc::clone(self);
        let mut identities = self.identity.watch_identity();
        tokio::spawn(async move {
            while let Some(identity) = identities.next().await {
                info!(
                    "[FavoritesStore] Identity is now {:?}, reloading favorites",
                    identity.uid()
                );
                store.load().await;
            }
            debug!("[FavoritesStore] Identity stream closed");
        })
    }
}
