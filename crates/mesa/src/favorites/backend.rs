//! Favorites persistence backends
//!
//! The store picks one backend per operation from the current identity:
//! `CloudBackend` for a signed-in user when a cloud store is configured,
//! `LocalBackend` otherwise.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use mesa_api::{Favorite, PersistenceError, Place};
use mesa_core::{CloudDocumentStore, LocalDeviceStore, MaybeSendSync};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendKind {
    Cloud,
    Local,
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait FavoritesBackend: MaybeSendSync {
    fn kind(&self) -> BackendKind;

    /// All persisted favorites, newest first.
    async fn list(&self) -> Result<Vec<Favorite>, PersistenceError>;

    /// Persist `favorite`, replacing any record with the same place id.
    async fn save(&self, favorite: &Favorite) -> Result<(), PersistenceError>;

    /// Remove the record for `place_id`. Removing an absent record succeeds.
    async fn delete(&self, place_id: &str) -> Result<(), PersistenceError>;
}

/// Favorites of one user in the cloud document store.
pub struct CloudBackend {
    store: Arc<dyn CloudDocumentStore>,
    uid: String,
}

impl CloudBackend {
    pub fn new(store: Arc<dyn CloudDocumentStore>, uid: impl Into<String>) -> Self {
        Self {
            store,
            uid: uid.into(),
        }
    }
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl FavoritesBackend for CloudBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Cloud
    }

    async fn list(&self) -> Result<Vec<Favorite>, PersistenceError> {
        self.store.list_ordered_by_saved_at_desc(&self.uid).await
    }

    async fn save(&self, favorite: &Favorite) -> Result<(), PersistenceError> {
        self.store.put(&self.uid, &favorite.place_id, favorite).await
    }

    async fn delete(&self, place_id: &str) -> Result<(), PersistenceError> {
        self.store.delete(&self.uid, place_id).await
    }
}

/// Element of the stored array. Arrays written before records carried a save
/// time hold bare places.
#[derive(Deserialize)]
#[serde(untagged)]
enum StoredEntry {
    Favorite(Favorite),
    Place(Place),
}

impl From<StoredEntry> for Favorite {
    fn from(entry: StoredEntry) -> Self {
        match entry {
            StoredEntry::Favorite(favorite) => favorite,
            StoredEntry::Place(place) => Favorite::new(place, DateTime::<Utc>::UNIX_EPOCH),
        }
    }
}

/// The favorites array under one key of the device store.
///
/// Mutations read, modify and write the whole array. They are serialized by a
/// single write lane so concurrent saves never drop each other's entries.
pub struct LocalBackend {
    store: Arc<dyn LocalDeviceStore>,
    key: String,
    lane: Mutex<()>,
}

impl LocalBackend {
    pub fn new(store: Arc<dyn LocalDeviceStore>, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
            lane: Mutex::new(()),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Decode the stored array. A missing key is an empty list.
    pub fn read(&self) -> Result<Vec<Favorite>, PersistenceError> {
        let Some(raw) = self.store.get(&self.key)? else {
            return Ok(Vec::new());
        };
        let entries: Vec<StoredEntry> = serde_json::from_str(&raw)?;
        let mut favorites: Vec<Favorite> = Vec::with_capacity(entries.len());
        for favorite in entries.into_iter().map(Favorite::from) {
            if !favorites.iter().any(|f| f.place_id == favorite.place_id) {
                favorites.push(favorite);
            }
        }
        Ok(favorites)
    }

    /// Like `read`, but an undecodable payload counts as empty so it can be overwritten.
    fn read_for_update(&self) -> Result<Vec<Favorite>, PersistenceError> {
        match self.read() {
            Err(PersistenceError::Serialization { message }) => {
                warn!(
                    "[LocalBackend] Discarding undecodable {} payload: {}",
                    self.key, message
                );
                Ok(Vec::new())
            }
            other => other,
        }
    }

    fn write(&self, favorites: &[Favorite]) -> Result<(), PersistenceError> {
        let raw = serde_json::to_string(favorites)?;
        self.store.set(&self.key, &raw)?;
        debug!(
            "[LocalBackend] Stored {} favorites under {}",
            favorites.len(),
            self.key
        );
        Ok(())
    }
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl FavoritesBackend for LocalBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Local
    }

    async fn list(&self) -> Result<Vec<Favorite>, PersistenceError> {
        self.read()
    }

    async fn save(&self, favorite: &Favorite) -> Result<(), PersistenceError> {
        let _lane = self.lane.lock().await;
        let mut favorites = self.read_for_update()?;
        if favorites.iter().any(|f| f.place_id == favorite.place_id) {
            return Ok(());
        }
        favorites.insert(0, favorite.clone());
        self.write(&favorites)
    }

    async fn delete(&self, place_id: &str) -> Result<(), PersistenceError> {
        let _lane = self.lane.lock().await;
        let mut favorites = self.read_for_update()?;
        favorites.retain(|f| f.place_id != place_id);
        self.write(&favorites)
    }
}
