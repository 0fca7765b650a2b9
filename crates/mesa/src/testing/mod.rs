//! Test doubles shared by unit, integration and cucumber tests
//!
//! - `ScriptedAuthenticator`: replays queued sign-in outcomes
//! - `TestHarness`: a `MesaApp` wired to in-memory fakes

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use mesa_api::{AuthError, Identity};
use mesa_core::CloudDocumentStore;
use mesa_firebase::InMemoryDocumentStore;
use mesa_places::FakePlacesGateway;

use crate::app::MesaApp;
use crate::config::MesaConfig;
use crate::identity::{Authenticator, SessionIdentityProvider};
use crate::storage::MemoryLocalStore;

/// Returns queued outcomes in order; an empty queue behaves like a dismissed dialog.
#[derive(Default)]
pub struct ScriptedAuthenticator {
    outcomes: Mutex<VecDeque<Result<Identity, AuthError>>>,
    calls: AtomicUsize,
}

impl ScriptedAuthenticator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn then(self, outcome: Result<Identity, AuthError>) -> Self {
        self.push(outcome);
        self
    }

    pub fn push(&self, outcome: Result<Identity, AuthError>) {
        self.outcomes
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push_back(outcome);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Authenticator for ScriptedAuthenticator {
    async fn authenticate(&self) -> Result<Identity, AuthError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.outcomes
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .pop_front()
            .unwrap_or(Err(AuthError::Cancelled))
    }
}

/// `MesaApp` over fakes, with handles to each fake for assertions.
pub struct TestHarness {
    pub app: MesaApp,
    pub gateway: Arc<FakePlacesGateway>,
    pub cloud: Arc<InMemoryDocumentStore>,
    pub local: Arc<MemoryLocalStore>,
    pub authenticator: Arc<ScriptedAuthenticator>,
    pub identity: Arc<SessionIdentityProvider>,
}

impl TestHarness {
    pub fn new() -> Self {
        Self::build(true)
    }

    /// Harness whose app has no cloud store configured.
    pub fn local_only() -> Self {
        Self::build(false)
    }

    fn build(with_cloud: bool) -> Self {
        let gateway = Arc::new(FakePlacesGateway::new());
        let cloud = Arc::new(InMemoryDocumentStore::new());
        let local = Arc::new(MemoryLocalStore::new());
        let authenticator = Arc::new(ScriptedAuthenticator::new());
        let identity = Arc::new(SessionIdentityProvider::new(authenticator.clone()));

        let app = MesaApp::with_collaborators(
            MesaConfig::default(),
            gateway.clone(),
            with_cloud.then(|| cloud.clone() as Arc<dyn CloudDocumentStore>),
            local.clone(),
            identity.clone(),
        );

        Self {
            app,
            gateway,
            cloud,
            local,
            authenticator,
            identity,
        }
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}
