//! Composition root
//!
//! `MesaApp` owns the wired collaborators: the places gateway, the optional
//! cloud document store, the device store, the identity session and the
//! favorites store built on top of them.

use anyhow::{Context, Result};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use mesa_api::Place;
use mesa_core::{CloudDocumentStore, IdentityProvider, LocalDeviceStore, SearchGateway};
use mesa_firebase::{FirestoreClient, StaticTokenSource};
use mesa_places::PlacesClient;

use crate::config::MesaConfig;
use crate::favorites::FavoritesStore;
use crate::logging::init_logging;
use crate::identity::{Authenticator, SessionIdentityProvider};
use crate::search::{PagedResults, SearchService};
use crate::storage::FileLocalStore;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("places API key is not configured (set places.api_key or MESA_PLACES_API_KEY)")]
    MissingPlacesKey,
}

pub struct MesaApp {
    config: MesaConfig,
    search: SearchService,
    identity: Arc<dyn IdentityProvider>,
    favorites: Arc<FavoritesStore>,
}

impl MesaApp {
    /// Wire the production collaborators described by `config`.
    ///
    /// The places key is required. Without a complete Firebase section
    /// favorites stay on the device for every identity.
    pub fn from_config(config: MesaConfig, authenticator: Arc<dyn Authenticator>) -> Result<Self> {
        if config.places.api_key.trim().is_empty() {
            return Err(AppError::MissingPlacesKey.into());
        }
        let places = PlacesClient::new(&config.places.api_key)
            .context("Failed to create places client")?
            .with_language(Some(config.places.language.clone()));

        let cloud: Option<Arc<dyn CloudDocumentStore>> = if config.firebase.is_configured() {
            let tokens = StaticTokenSource::new(config.firebase.id_token.clone());
            let client = FirestoreClient::new(&config.firebase, Box::new(tokens))
                .context("Failed to create document store client")?;
            info!(
                "[MesaApp] Cloud favorites enabled for project {}",
                config.firebase.project_id
            );
            Some(Arc::new(client))
        } else {
            warn!("[MesaApp] Firebase is not configured; favorites are stored on this device only");
            None
        };

        let local = Arc::new(FileLocalStore::new(config.storage.dir.clone()));
        let identity = Arc::new(SessionIdentityProvider::new(authenticator));

        Ok(Self::with_collaborators(
            config,
            Arc::new(places),
            cloud,
            local,
            identity,
        ))
    }

    /// Wire explicit collaborators, typically fakes.
    pub fn with_collaborators(
        config: MesaConfig,
        gateway: Arc<dyn SearchGateway>,
        cloud: Option<Arc<dyn CloudDocumentStore>>,
        local: Arc<dyn LocalDeviceStore>,
        identity: Arc<dyn IdentityProvider>,
    ) -> Self {
        let favorites = FavoritesStore::builder(Arc::clone(&identity), local)
            .maybe_cloud(cloud)
            .photo_resolver(Arc::clone(&gateway))
            .favorites_key(config.storage.favorites_key.clone())
            .build();
        let search =
            SearchService::new(gateway).with_default_radius(config.search.default_radius_m);

        Self {
            config,
            search,
            identity,
            favorites,
        }
    }

    /// Install the tracing subscriber with the configured filter.
    /// Returns false when a subscriber was already installed.
    pub fn init_tracing(&self) -> bool {
        init_logging(&self.config.logging.filter)
    }

    pub fn config(&self) -> &MesaConfig {
        &self.config
    }

    pub fn search(&self) -> &SearchService {
        &self.search
    }

    pub fn favorites(&self) -> &Arc<FavoritesStore> {
        &self.favorites
    }

    pub fn identity(&self) -> &Arc<dyn IdentityProvider> {
        &self.identity
    }

    /// Empty result list paginated with the configured page size.
    pub fn paged_results(&self) -> PagedResults<Place> {
        PagedResults::new(self.config.search.page_size)
    }

    /// Keep favorites in step with the identity. The first load runs immediately.
    pub fn start(&self) -> JoinHandle<()> {
        self.favorites.spawn_identity_watcher()
    }
}
