//! Mesa: restaurant discovery with identity-aware favorites
//!
//! - `search`: gateway call selection, client-side filters and pagination
//! - `favorites`: the favorites store and its cloud/local backends
//! - `identity`: the sign-in session
//! - `storage`: device key-value stores
//! - `config`, `logging`, `app`: configuration, tracing setup and wiring

pub mod app;
pub mod config;
pub mod favorites;
pub mod identity;
pub mod logging;
pub mod search;
pub mod storage;
#[cfg(not(target_arch = "wasm32"))]
pub mod testing;

pub use app::{AppError, MesaApp};
pub use config::MesaConfig;
pub use favorites::{BackendKind, FavoritesStatus, FavoritesStore};
pub use identity::{Authenticator, SessionIdentityProvider, StaticAuthenticator};
pub use logging::init_logging;
pub use search::{PagedResults, Pagination, SearchService};
