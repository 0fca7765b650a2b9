//! Favorites store behavior across identities and backends

use async_trait::async_trait;
use mesa::favorites::{BackendKind, FavoritesStore};
use mesa::identity::{SessionIdentityProvider, StaticAuthenticator};
use mesa::storage::MemoryLocalStore;
use mesa::testing::TestHarness;
use mesa_api::{Favorite, Identity, LatLng, PersistenceError, Place};
use mesa_core::constants::DEFAULT_FAVORITES_KEY;
use mesa_core::{CloudDocumentStore, IdentityProvider, LocalDeviceStore};
use mesa_firebase::InMemoryDocumentStore;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;

fn place(id: &str) -> Place {
    Place::new(id, format!("Restaurante {id}"), "Roma Norte", LatLng::new(19.42, -99.16))
}

fn stored_ids(local: &MemoryLocalStore) -> Vec<String> {
    local
        .get(DEFAULT_FAVORITES_KEY)
        .unwrap()
        .map(|raw| serde_json::from_str::<Vec<Favorite>>(&raw).unwrap())
        .unwrap_or_default()
        .into_iter()
        .map(|f| f.place_id)
        .collect()
}

async fn sign_in(harness: &TestHarness, uid: &str) {
    harness.authenticator.push(Ok(Identity::authenticated(uid)));
    harness.identity.sign_in().await.unwrap();
}

#[tokio::test]
async fn test_add_and_remove_are_idempotent() {
    let harness = TestHarness::new();
    let store = harness.app.favorites();

    store.add(&place("a")).await.unwrap();
    store.add(&place("a")).await.unwrap();
    assert_eq!(store.len(), 1);
    assert_eq!(stored_ids(&harness.local), vec!["a"]);

    store.remove("a").await.unwrap();
    store.remove("a").await.unwrap();
    assert!(store.is_empty());
    assert!(stored_ids(&harness.local).is_empty());
}

#[tokio::test]
async fn test_anonymous_favorites_reload_from_device() {
    let harness = TestHarness::new();
    harness.app.favorites().add(&place("a")).await.unwrap();
    harness.app.favorites().add(&place("b")).await.unwrap();

    // A fresh store over the same device storage
    let reloaded = FavoritesStore::builder(harness.identity.clone(), harness.local.clone()).build();
    let favorites = reloaded.load().await;

    let ids: Vec<&str> = favorites.iter().map(|f| f.place_id.as_str()).collect();
    assert_eq!(ids, vec!["b", "a"]);
    assert_eq!(reloaded.status().backend, Some(BackendKind::Local));
}

#[tokio::test]
async fn test_anonymous_toggle_twice_stores_empty_array() {
    let harness = TestHarness::new();
    let store = harness.app.favorites();

    assert!(store.toggle(&place("a")).await.unwrap());
    assert!(!store.toggle(&place("a")).await.unwrap());

    assert_eq!(
        harness.local.get(DEFAULT_FAVORITES_KEY).unwrap().as_deref(),
        Some("[]")
    );
}

#[tokio::test]
async fn test_unreachable_cloud_loads_device_favorites() {
    let harness = TestHarness::new();
    harness.app.favorites().add(&place("cached")).await.unwrap();

    sign_in(&harness, "ana").await;
    harness.cloud.set_reachable(false);

    let favorites = harness.app.favorites().load().await;
    assert_eq!(favorites.len(), 1);
    assert_eq!(favorites[0].place_id, "cached");

    let status = harness.app.favorites().status();
    assert_eq!(status.backend, Some(BackendKind::Local));
    assert!(status.last_error.is_some());
}

#[tokio::test]
async fn test_signed_in_user_does_not_inherit_anonymous_favorites() {
    let harness = TestHarness::new();
    harness.app.favorites().add(&place("device-only")).await.unwrap();

    sign_in(&harness, "ana").await;
    let favorites = harness.app.favorites().load().await;

    assert!(favorites.is_empty());
    assert_eq!(harness.cloud.len("ana"), 0);
    assert_eq!(stored_ids(&harness.local), vec!["device-only"]);
}

#[tokio::test]
async fn test_users_only_see_their_own_records() {
    let harness = TestHarness::new();
    sign_in(&harness, "ana").await;
    harness.app.favorites().add(&place("a")).await.unwrap();

    harness.identity.sign_out().await.unwrap();
    sign_in(&harness, "luis").await;
    assert!(harness.app.favorites().load().await.is_empty());

    harness.identity.sign_out().await.unwrap();
    sign_in(&harness, "ana").await;
    assert_eq!(harness.app.favorites().load().await.len(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_toggles_of_one_place_serialize() {
    let harness = TestHarness::new();
    let store = Arc::clone(harness.app.favorites());

    let tasks: Vec<_> = (0..8)
        .map(|_| {
            let store = Arc::clone(&store);
            tokio::spawn(async move { store.toggle(&place("a")).await })
        })
        .collect();

    let added = futures::future::join_all(tasks)
        .await
        .into_iter()
        .filter(|outcome| *outcome.as_ref().unwrap().as_ref().unwrap())
        .count();

    // Each toggle observes the previous one, so adds and removes alternate
    assert_eq!(added, 4);
    assert!(!store.contains("a"));
    assert!(stored_ids(&harness.local).is_empty());
}

/// Cloud store whose listings wait for a permit.
struct GatedCloud {
    inner: InMemoryDocumentStore,
    gate: Semaphore,
}

#[async_trait]
impl CloudDocumentStore for GatedCloud {
    async fn put(
        &self,
        uid: &str,
        place_id: &str,
        record: &Favorite,
    ) -> Result<(), PersistenceError> {
        self.inner.put(uid, place_id, record).await
    }

    async fn delete(&self, uid: &str, place_id: &str) -> Result<(), PersistenceError> {
        self.inner.delete(uid, place_id).await
    }

    async fn list_ordered_by_saved_at_desc(
        &self,
        uid: &str,
    ) -> Result<Vec<Favorite>, PersistenceError> {
        let _permit = self.gate.acquire().await.unwrap();
        self.inner.list_ordered_by_saved_at_desc(uid).await
    }
}

#[tokio::test]
async fn test_superseded_load_does_not_publish() {
    let cloud = Arc::new(GatedCloud {
        inner: InMemoryDocumentStore::new(),
        gate: Semaphore::new(0),
    });
    cloud
        .inner
        .put("ana", "cloud-only", &Favorite::new(place("cloud-only"), chrono::Utc::now()))
        .await
        .unwrap();

    let local = Arc::new(MemoryLocalStore::new());
    let identity = Arc::new(SessionIdentityProvider::with_identity(
        Arc::new(StaticAuthenticator::unavailable()),
        Identity::authenticated("ana"),
    ));
    let store = FavoritesStore::builder(identity.clone(), local.clone())
        .cloud(cloud.clone())
        .build();

    let slow = {
        let store = Arc::clone(&store);
        tokio::spawn(async move { store.load().await })
    };
    tokio::task::yield_now().await;

    identity.sign_out().await.unwrap();
    store.add(&place("device")).await.unwrap();
    let latest = store.load().await;
    assert_eq!(latest.len(), 1);

    cloud.gate.add_permits(1);
    let stale = slow.await.unwrap();

    assert_eq!(stale, latest);
    assert_eq!(store.favorites(), latest);
    assert_eq!(store.status().backend, Some(BackendKind::Local));
}

#[tokio::test]
async fn test_identity_watcher_reloads_on_sign_in() {
    let harness = TestHarness::new();
    harness
        .cloud
        .put("ana", "remote", &Favorite::new(place("remote"), chrono::Utc::now()))
        .await
        .unwrap();

    let watcher = harness.app.start();
    sign_in(&harness, "ana").await;

    let store = harness.app.favorites();
    tokio::time::timeout(Duration::from_secs(2), async {
        while !store.contains("remote") {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("watcher should load cloud favorites after sign-in");
    assert_eq!(store.status().backend, Some(BackendKind::Cloud));

    watcher.abort();
}

#[tokio::test]
async fn test_corrupt_device_payload_loads_empty_and_is_replaced() {
    let harness = TestHarness::new();
    harness.local.set(DEFAULT_FAVORITES_KEY, "[{broken").unwrap();

    let favorites = harness.app.favorites().load().await;
    assert!(favorites.is_empty());
    assert!(harness.app.favorites().status().last_error.is_some());

    harness.app.favorites().add(&place("a")).await.unwrap();
    assert_eq!(stored_ids(&harness.local), vec!["a"]);
}

#[tokio::test]
async fn test_device_write_failure_is_surfaced() {
    let harness = TestHarness::new();
    harness.local.set_fail_writes(true);

    assert!(harness.app.favorites().add(&place("a")).await.is_err());
    assert!(!harness.app.favorites().contains("a"));
}
