//! Place records as returned by the places provider
//!
//! Field names follow the provider's snake_case JSON so that records read from
//! the web service, the cloud store and the local device store share one shape.
//! Absent optional fields are omitted on serialization rather than written as `null`.

use serde::{Deserialize, Serialize};

/// A geographic coordinate in floating point degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub northeast: LatLng,
    pub southwest: LatLng,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    pub location: LatLng,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub viewport: Option<Viewport>,
}

/// Reference to a provider-hosted photo. Resolve to a URL through the search gateway.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacePhoto {
    pub photo_reference: String,
    #[serde(default)]
    pub width: u32,
    #[serde(default)]
    pub height: u32,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub html_attributions: Vec<String>,
}

/// Day (0 = Sunday) and 24h `HHMM` time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayTime {
    pub day: u8,
    pub time: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpeningPeriod {
    pub open: DayTime,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub close: Option<DayTime>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OpeningHours {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub open_now: Option<bool>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub periods: Vec<OpeningPeriod>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub weekday_text: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceReview {
    pub author_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_url: Option<String>,
    #[serde(default)]
    pub language: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_photo_url: Option<String>,
    pub rating: f64,
    #[serde(default)]
    pub relative_time_description: String,
    #[serde(default)]
    pub text: String,
    /// Seconds since the Unix epoch
    pub time: i64,
}

/// A point of interest. `place_id` is the sole key for equality and deduplication.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
    pub place_id: String,
    pub name: String,
    pub formatted_address: String,
    pub geometry: Geometry,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_ratings_total: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_level: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photos: Option<Vec<PlacePhoto>>,
    /// Resolved URL of the primary photo. Only snapshots carry it.
    #[serde(
        default,
        rename = "photoUrl",
        alias = "photo_url",
        skip_serializing_if = "Option::is_none"
    )]
    pub photo_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub types: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opening_hours: Option<OpeningHours>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub formatted_phone_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub international_phone_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reviews: Option<Vec<PlaceReview>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub business_status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vicinity: Option<String>,
}

impl Place {
    pub fn new(
        place_id: impl Into<String>,
        name: impl Into<String>,
        formatted_address: impl Into<String>,
        location: LatLng,
    ) -> Self {
        Self {
            place_id: place_id.into(),
            name: name.into(),
            formatted_address: formatted_address.into(),
            geometry: Geometry {
                location,
                viewport: None,
            },
            rating: None,
            user_ratings_total: None,
            price_level: None,
            photos: None,
            photo_url: None,
            types: None,
            opening_hours: None,
            formatted_phone_number: None,
            international_phone_number: None,
            website: None,
            reviews: None,
            business_status: None,
            vicinity: None,
        }
    }

    pub fn location(&self) -> LatLng {
        self.geometry.location
    }

    /// First photo reference, if the provider returned any.
    pub fn primary_photo(&self) -> Option<&PlacePhoto> {
        self.photos.as_ref().and_then(|photos| photos.first())
    }

    /// Reduced copy suitable for a cloud favorite record.
    ///
    /// Keeps identity, address, geometry and the summary fields; drops photo
    /// references, hours, contact details and reviews. `photo_url` replaces the
    /// photo references when the caller could resolve one.
    pub fn snapshot(&self, photo_url: Option<String>) -> Place {
        Place {
            place_id: self.place_id.clone(),
            name: self.name.clone(),
            formatted_address: self.formatted_address.clone(),
            geometry: self.geometry.clone(),
            rating: self.rating,
            user_ratings_total: self.user_ratings_total,
            price_level: self.price_level,
            photos: None,
            photo_url: photo_url.or_else(|| self.photo_url.clone()),
            types: self.types.clone(),
            opening_hours: None,
            formatted_phone_number: None,
            international_phone_number: None,
            website: None,
            reviews: None,
            business_status: None,
            vicinity: self.vicinity.clone(),
        }
    }

    pub fn with_rating(mut self, rating: f64) -> Self {
        self.rating = Some(rating);
        self
    }

    pub fn with_price_level(mut self, price_level: u8) -> Self {
        self.price_level = Some(price_level);
        self
    }

    pub fn with_types<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.types = Some(types.into_iter().map(Into::into).collect());
        self
    }
}
