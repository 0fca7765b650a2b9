//! Session-backed identity provider
//!
//! The interactive sign-in flow lives outside this crate. It is plugged in as an
//! `Authenticator`; the session keeps the resulting identity in a watch channel
//! so subscribers see the current value first and every transition after it.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;
use tracing::{info, warn};

use mesa_api::{AuthError, Identity};
use mesa_core::{IdentityProvider, IdentityStream, MaybeSendSync};

/// Performs the actual sign-in with an external identity service.
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait Authenticator: MaybeSendSync {
    async fn authenticate(&self) -> Result<Identity, AuthError>;

    /// Invalidate the session of `identity` with the service.
    async fn revoke(&self, _identity: &Identity) -> Result<(), AuthError> {
        Ok(())
    }
}

/// Returns a fixed identity, or `AuthError::Unavailable` when built without one.
pub struct StaticAuthenticator {
    identity: Option<Identity>,
}

impl StaticAuthenticator {
    pub fn new(identity: Identity) -> Self {
        Self {
            identity: Some(identity),
        }
    }

    pub fn unavailable() -> Self {
        Self { identity: None }
    }
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl Authenticator for StaticAuthenticator {
    async fn authenticate(&self) -> Result<Identity, AuthError> {
        self.identity.clone().ok_or(AuthError::Unavailable)
    }
}

pub struct SessionIdentityProvider {
    authenticator: Arc<dyn Authenticator>,
    current: watch::Sender<Identity>,
}

impl SessionIdentityProvider {
    pub fn new(authenticator: Arc<dyn Authenticator>) -> Self {
        Self::with_identity(authenticator, Identity::Anonymous)
    }

    /// Start with a restored session instead of anonymous.
    pub fn with_identity(authenticator: Arc<dyn Authenticator>, identity: Identity) -> Self {
        let (current, _) = watch::channel(identity);
        Self {
            authenticator,
            current,
        }
    }

    fn publish(&self, identity: Identity) {
        // send_replace succeeds with no receivers
        let previous = self.current.send_replace(identity.clone());
        if previous != identity {
            info!(
                "[SessionIdentityProvider] Identity changed: {:?} -> {:?}",
                previous.uid(),
                identity.uid()
            );
        }
    }
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl IdentityProvider for SessionIdentityProvider {
    fn current_identity(&self) -> Identity {
        self.current.borrow().clone()
    }

    async fn sign_in(&self) -> Result<Identity, AuthError> {
        match self.authenticator.authenticate().await {
            Ok(identity) => {
                self.publish(identity.clone());
                Ok(identity)
            }
            Err(e) => {
                warn!("[SessionIdentityProvider] Sign-in failed: {}", e);
                Err(e)
            }
        }
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        let identity = self.current_identity();
        if identity.is_authenticated() {
            self.authenticator.revoke(&identity).await?;
        }
        self.publish(Identity::Anonymous);
        Ok(())
    }

    fn watch_identity(&self) -> IdentityStream {
        Box::pin(WatchStream::new(self.current.subscribe()))
    }
}
