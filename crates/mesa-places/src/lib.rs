//! Places web service integration for mesa
//!
//! This crate provides:
//! - `client` - PlacesClient (HTTP client implementing `SearchGateway`)
//! - `models` - web service response models
//! - `converters` - response to `Place` conversion
//! - `fake` - FakePlacesGateway for tests and offline runs

pub mod client;
pub mod converters;
#[cfg(not(target_arch = "wasm32"))]
pub mod fake;
pub mod models;


pub use client::{PlacesClient, parse_details_response, parse_search_response};
pub use converters::convert_results;
#[cfg(not(target_arch = "wasm32"))]
pub use fake::{FakePlacesGateway, GatewayCall};
