//! In-memory document store for tests and offline runs
//!
//! Records are kept in their encoded document form so the typed-value codec is
//! exercised on every write and read. Reachability can be switched off to
//! simulate an offline device.

use async_trait::async_trait;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};
use tracing::warn;

use mesa_api::{Favorite, PersistenceError};
use mesa_core::CloudDocumentStore;

use crate::value::{favorite_from_fields, favorite_to_fields};

type Documents = HashMap<String, HashMap<String, Map<String, Value>>>;

pub struct InMemoryDocumentStore {
    /// uid -> place id -> document fields
    documents: Mutex<Documents>,
    reachable: AtomicBool,
    writes: AtomicUsize,
}

impl Default for InMemoryDocumentStore {
    fn default() -> Self {
        Self {
            documents: Mutex::new(HashMap::new()),
            reachable: AtomicBool::new(true),
            writes: AtomicUsize::new(0),
        }
    }
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_reachable(&self, reachable: bool) {
        self.reachable.store(reachable, Ordering::SeqCst);
    }

    /// Number of successful puts and deletes.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// Encoded fields of one stored document.
    pub fn document(&self, uid: &str, place_id: &str) -> Option<Map<String, Value>> {
        self.lock()
            .get(uid)
            .and_then(|docs| docs.get(place_id))
            .cloned()
    }

    /// Store raw document fields, bypassing the favorite encoding.
    pub fn insert_document(&self, uid: &str, place_id: &str, fields: Map<String, Value>) {
        self.lock()
            .entry(uid.to_string())
            .or_default()
            .insert(place_id.to_string(), fields);
    }

    pub fn len(&self, uid: &str) -> usize {
        self.lock().get(uid).map(HashMap::len).unwrap_or(0)
    }

    fn lock(&self) -> MutexGuard<'_, Documents> {
        self.documents
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn check_reachable(&self) -> Result<(), PersistenceError> {
        if self.reachable.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(PersistenceError::unreachable("document store is offline"))
        }
    }
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl CloudDocumentStore for InMemoryDocumentStore {
    async fn put(
        &self,
        uid: &str,
        place_id: &str,
        record: &Favorite,
    ) -> Result<(), PersistenceError> {
        self.check_reachable()?;
        let fields = favorite_to_fields(record)?;
        self.lock()
            .entry(uid.to_string())
            .or_default()
            .insert(place_id.to_string(), fields);
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn delete(&self, uid: &str, place_id: &str) -> Result<(), PersistenceError> {
        self.check_reachable()?;
        if let Some(docs) = self.lock().get_mut(uid) {
            docs.remove(place_id);
        }
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn list_ordered_by_saved_at_desc(
        &self,
        uid: &str,
    ) -> Result<Vec<Favorite>, PersistenceError> {
        self.check_reachable()?;
        let mut favorites: Vec<Favorite> = self
            .lock()
            .get(uid)
            .map(|docs| {
                docs.iter()
                    .filter_map(|(place_id, fields)| match favorite_from_fields(fields) {
                        Ok(favorite) => Some(favorite),
                        Err(e) => {
                            warn!("[InMemoryDocumentStore] Skipping document {}: {}", place_id, e);
                            None
                        }
                    })
                    .collect()
            })
            .unwrap_or_default();
        favorites.sort_by(|a, b| b.saved_at.cmp(&a.saved_at));
        Ok(favorites)
    }
}
