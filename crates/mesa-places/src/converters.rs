//! Conversion from web service results to domain places

use tracing::warn;

use mesa_api::{GatewayError, Place};

use crate::models::PlaceApiResult;

/// A result becomes a place only with an identifier and a location.
impl TryFrom<PlaceApiResult> for Place {
    type Error = GatewayError;

    fn try_from(result: PlaceApiResult) -> Result<Self, Self::Error> {
        let Some(place_id) = result.place_id.filter(|id| !id.trim().is_empty()) else {
            return Err(GatewayError::Decode {
                message: format!(
                    "result {:?} has no place_id",
                    result.name.as_deref().unwrap_or_default()
                ),
            });
        };
        let Some(geometry) = result.geometry else {
            return Err(GatewayError::Decode {
                message: format!("place {} has no geometry", place_id),
            });
        };

        // Nearby search only returns `vicinity`
        let formatted_address = result
            .formatted_address
            .filter(|address| !address.is_empty())
            .or_else(|| result.vicinity.clone())
            .unwrap_or_default();

        Ok(Place {
            place_id,
            name: result.name.unwrap_or_default(),
            formatted_address,
            geometry,
            rating: result.rating,
            user_ratings_total: result.user_ratings_total,
            price_level: result.price_level,
            photos: result.photos,
            photo_url: None,
            types: result.types,
            opening_hours: result.opening_hours,
            formatted_phone_number: result.formatted_phone_number,
            international_phone_number: result.international_phone_number,
            website: result.website,
            reviews: result.reviews,
            business_status: result.business_status,
            vicinity: result.vicinity,
        })
    }
}

/// Convert a result list, dropping entries that cannot be keyed or located.
pub fn convert_results(results: Vec<PlaceApiResult>) -> Vec<Place> {
    results
        .into_iter()
        .filter_map(|result| match Place::try_from(result) {
            Ok(place) => Some(place),
            Err(e) => {
                warn!("[PlacesClient] Skipping result: {}", e);
                None
            }
        })
        .collect()
}
