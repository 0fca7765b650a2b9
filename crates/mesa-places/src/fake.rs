//! In-memory places gateway for tests and offline runs
//!
//! FakePlacesGateway serves a fixed catalog of places:
//! - text search matches the query against name, address and types
//! - nearby search keeps places within the radius whose types include the category
//! - every call is recorded so tests can assert which endpoint was used

use async_trait::async_trait;
use std::sync::{Mutex, MutexGuard};

use mesa_api::{GatewayError, LatLng, Place};
use mesa_core::{SearchGateway, distance_between};

#[derive(Debug, Clone, PartialEq)]
pub enum GatewayCall {
    Text {
        query: String,
        origin: Option<LatLng>,
    },
    Nearby {
        origin: LatLng,
        radius_m: u32,
        category: Option<String>,
    },
    Details {
        place_id: String,
    },
}

#[derive(Default)]
pub struct FakePlacesGateway {
    places: Mutex<Vec<Place>>,
    calls: Mutex<Vec<GatewayCall>>,
    /// Returned by every call while set
    failure: Mutex<Option<GatewayError>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl FakePlacesGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_places(places: Vec<Place>) -> Self {
        Self {
            places: Mutex::new(places),
            ..Self::default()
        }
    }

    pub fn insert(&self, place: Place) {
        let mut places = lock(&self.places);
        places.retain(|p| p.place_id != place.place_id);
        places.push(place);
    }

    pub fn fail_with(&self, error: GatewayError) {
        *lock(&self.failure) = Some(error);
    }

    pub fn clear_failure(&self) {
        *lock(&self.failure) = None;
    }

    pub fn calls(&self) -> Vec<GatewayCall> {
        lock(&self.calls).clone()
    }

    fn record(&self, call: GatewayCall) -> Result<(), GatewayError> {
        lock(&self.calls).push(call);
        match lock(&self.failure).clone() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    fn matches_text(place: &Place, needle: &str) -> bool {
        place.name.to_lowercase().contains(needle)
            || place.formatted_address.to_lowercase().contains(needle)
            || place
                .types
                .iter()
                .flatten()
                .any(|t| t.to_lowercase().contains(needle))
    }
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl SearchGateway for FakePlacesGateway {
    async fn search_by_text(
        &self,
        query: &str,
        origin: Option<LatLng>,
    ) -> Result<Vec<Place>, GatewayError> {
        self.record(GatewayCall::Text {
            query: query.to_string(),
            origin,
        })?;

        let needle = query.trim().to_lowercase();
        Ok(lock(&self.places)
            .iter()
            .filter(|place| Self::matches_text(place, &needle))
            .cloned()
            .collect())
    }

    async fn search_nearby(
        &self,
        origin: LatLng,
        radius_m: u32,
        category: Option<&str>,
    ) -> Result<Vec<Place>, GatewayError> {
        self.record(GatewayCall::Nearby {
            origin,
            radius_m,
            category: category.map(str::to_string),
        })?;

        Ok(lock(&self.places)
            .iter()
            .filter(|place| distance_between(origin, place.location()) <= radius_m as f64)
            .filter(|place| match category {
                Some(category) => place.types.iter().flatten().any(|t| t == category),
                None => true,
            })
            .cloned()
            .collect())
    }

    async fn get_details(&self, place_id: &str) -> Result<Place, GatewayError> {
        self.record(GatewayCall::Details {
            place_id: place_id.to_string(),
        })?;

        lock(&self.places)
            .iter()
            .find(|place| place.place_id == place_id)
            .cloned()
            .ok_or_else(|| GatewayError::Status {
                status: "NOT_FOUND".to_string(),
                message: None,
            })
    }

    fn resolve_photo_url(&self, photo_reference: &str, max_width: u32) -> String {
        format!("https://photos.invalid/{}?maxwidth={}", photo_reference, max_width)
    }
}
