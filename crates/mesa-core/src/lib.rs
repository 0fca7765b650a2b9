//! Core contracts and pure domain logic for Mesa
//!
//! This crate provides:
//! - `traits`: the collaborator contracts (`SearchGateway`, `IdentityProvider`,
//!   `CloudDocumentStore`, `LocalDeviceStore`)
//! - `geo`: great-circle distance
//! - `format`, `constants`, `cuisine`: display helpers and reference data
//! - `telemetry`: trace context for outgoing requests

pub mod constants;
pub mod cuisine;
pub mod format;
pub mod geo;
pub mod telemetry;
pub mod traits;

pub use cuisine::{category, category_by_search_term, CuisineCategory, CUISINE_CATEGORIES};
pub use geo::{distance, distance_between, format_distance};
pub use telemetry::trace_context;
pub use traits::{
    CloudDocumentStore, IdentityProvider, IdentityStream, LocalDeviceStore, MaybeSendSync,
    SearchGateway,
};
