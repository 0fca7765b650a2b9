//! Firebase document-store integration for mesa
//!
//! This crate provides:
//! - `config` - FirebaseConfig (project settings and the "configured" check)
//! - `firestore` - FirestoreClient (REST client implementing `CloudDocumentStore`)
//! - `value` - typed-value codec for favorite documents
//! - `fake` - InMemoryDocumentStore for tests and offline runs

pub mod config;
#[cfg(not(target_arch = "wasm32"))]
pub mod fake;
pub mod firestore;
pub mod value;

pub use config::FirebaseConfig;
#[cfg(not(target_arch = "wasm32"))]
pub use fake::InMemoryDocumentStore;
pub use firestore::{FirestoreClient, StaticTokenSource, TokenSource, parse_run_query_response};
