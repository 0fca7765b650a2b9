use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::place::Place;

/// A saved snapshot of a place.
///
/// Used both as the cloud document body and as the element type of the local
/// device array. The snapshot is never refreshed from live place data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Favorite {
    pub place_id: String,
    pub saved_at: DateTime<Utc>,
    pub place_data: Place,
}

impl Favorite {
    pub fn new(place: Place, saved_at: DateTime<Utc>) -> Self {
        Self {
            place_id: place.place_id.clone(),
            saved_at,
            place_data: place,
        }
    }

    pub fn place(&self) -> &Place {
        &self.place_data
    }
}
