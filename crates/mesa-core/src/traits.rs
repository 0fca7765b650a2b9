//! Collaborator traits
//!
//! The engine depends only on these contracts. Concrete implementations live in
//! the provider crates (`mesa-places`, `mesa-firebase`) and in `mesa::storage`.

use async_trait::async_trait;
use std::pin::Pin;
use tokio_stream::Stream;

use mesa_api::{AuthError, Favorite, GatewayError, Identity, LatLng, PersistenceError, Place};

// Define MaybeSendSync trait alias for WASM compatibility
#[cfg(not(target_arch = "wasm32"))]
pub trait MaybeSendSync: Send + Sync {}
#[cfg(not(target_arch = "wasm32"))]
impl<T: Send + Sync + ?Sized> MaybeSendSync for T {}

#[cfg(target_arch = "wasm32")]
pub trait MaybeSendSync {}
#[cfg(target_arch = "wasm32")]
impl<T: ?Sized> MaybeSendSync for T {}

/// Stream of identity values. Dropping it unsubscribes.
pub type IdentityStream = Pin<Box<dyn Stream<Item = Identity> + Send>>;

/// Remote search over the places provider.
///
/// Implementations treat the provider's "zero results" status as success with an
/// empty list; any other non-OK status is a `GatewayError::Status`.
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait SearchGateway: MaybeSendSync {
    /// Free-text search, biased towards `origin` when given.
    async fn search_by_text(
        &self,
        query: &str,
        origin: Option<LatLng>,
    ) -> Result<Vec<Place>, GatewayError>;

    /// Places within `radius_m` meters of `origin`, optionally restricted to a place type.
    async fn search_nearby(
        &self,
        origin: LatLng,
        radius_m: u32,
        category: Option<&str>,
    ) -> Result<Vec<Place>, GatewayError>;

    async fn get_details(&self, place_id: &str) -> Result<Place, GatewayError>;

    /// URL of a provider-hosted photo scaled to at most `max_width` pixels.
    fn resolve_photo_url(&self, photo_reference: &str, max_width: u32) -> String;
}

/// Authentication state and transitions.
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait IdentityProvider: MaybeSendSync {
    fn current_identity(&self) -> Identity;

    async fn sign_in(&self) -> Result<Identity, AuthError>;

    async fn sign_out(&self) -> Result<(), AuthError>;

    /// Yields the current identity immediately, then every subsequent change.
    fn watch_identity(&self) -> IdentityStream;
}

/// Per-user favorite records in the cloud document store.
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait CloudDocumentStore: MaybeSendSync {
    /// Create or overwrite the record keyed by (`uid`, `place_id`).
    async fn put(&self, uid: &str, place_id: &str, record: &Favorite)
        -> Result<(), PersistenceError>;

    /// Delete the record keyed by (`uid`, `place_id`). Deleting an absent record succeeds.
    async fn delete(&self, uid: &str, place_id: &str) -> Result<(), PersistenceError>;

    /// All records for `uid`, newest `saved_at` first.
    async fn list_ordered_by_saved_at_desc(
        &self,
        uid: &str,
    ) -> Result<Vec<Favorite>, PersistenceError>;
}

/// Synchronous device-local key-value storage.
pub trait LocalDeviceStore: MaybeSendSync {
    fn get(&self, key: &str) -> Result<Option<String>, PersistenceError>;

    fn set(&self, key: &str, value: &str) -> Result<(), PersistenceError>;
}
