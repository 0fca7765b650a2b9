//! Per-key async locks
//!
//! Mutations of the same place are serialized; different places proceed
//! concurrently. Entries are dropped from the map once nobody holds or waits
//! for them.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::OwnedMutexGuard;

type KeyLock = Arc<tokio::sync::Mutex<()>>;

#[derive(Default)]
pub struct KeyedLocks {
    locks: Mutex<HashMap<String, KeyLock>>,
}

pub struct KeyGuard<'a> {
    owner: &'a KeyedLocks,
    key: String,
    lock: KeyLock,
    _guard: OwnedMutexGuard<()>,
}

impl KeyedLocks {
    pub fn new() -> Self {
        Self::default()
    }

    fn map(&self) -> MutexGuard<'_, HashMap<String, KeyLock>> {
        self.locks
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub async fn lock(&self, key: &str) -> KeyGuard<'_> {
        let lock = Arc::clone(self.map().entry(key.to_string()).or_default());
        let guard = Arc::clone(&lock).lock_owned().await;
        KeyGuard {
            owner: self,
            key: key.to_string(),
            lock,
            _guard: guard,
        }
    }

    /// Number of keys currently locked or awaited.
    pub fn active(&self) -> usize {
        self.map().len()
    }
}

impl Drop for KeyGuard<'_> {
    fn drop(&mut self) {
        let mut map = self.owner.map();
        // map + this guard's handle + the owned guard; anything more is a waiter
        if Arc::strong_count(&self.lock) <= 3 {
            map.remove(&self.key);
        }
    }
}
