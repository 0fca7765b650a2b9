use mesa_api::{Geometry, OpeningHours, PlacePhoto, PlaceReview};
use serde::{Deserialize, Serialize};

/// Status value of a successful request
pub const STATUS_OK: &str = "OK";
/// Status value of a search that matched nothing
pub const STATUS_ZERO_RESULTS: &str = "ZERO_RESULTS";

/// Fields requested from the details endpoint
pub const DETAILS_FIELDS: [&str; 16] = [
    "place_id",
    "name",
    "formatted_address",
    "geometry",
    "rating",
    "user_ratings_total",
    "price_level",
    "photos",
    "types",
    "opening_hours",
    "formatted_phone_number",
    "international_phone_number",
    "website",
    "reviews",
    "business_status",
    "vicinity",
];

/// Body of `textsearch` and `nearbysearch` responses
#[derive(Debug, Deserialize)]
pub struct PlacesSearchResponse {
    pub status: String,
    #[serde(default)]
    pub results: Vec<PlaceApiResult>,
    #[serde(default)]
    pub error_message: Option<String>,
    #[serde(default)]
    pub next_page_token: Option<String>,
}

/// Body of `details` responses
#[derive(Debug, Deserialize)]
pub struct PlaceDetailsResponse {
    pub status: String,
    #[serde(default)]
    pub result: Option<PlaceApiResult>,
    #[serde(default)]
    pub error_message: Option<String>,
}

/// A place as the web service returns it. Every field may be missing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlaceApiResult {
    pub place_id: Option<String>,
    pub name: Option<String>,
    pub formatted_address: Option<String>,
    pub geometry: Option<Geometry>,
    pub rating: Option<f64>,
    pub user_ratings_total: Option<u32>,
    pub price_level: Option<u8>,
    pub photos: Option<Vec<PlacePhoto>>,
    pub types: Option<Vec<String>>,
    pub opening_hours: Option<OpeningHours>,
    pub formatted_phone_number: Option<String>,
    pub international_phone_number: Option<String>,
    pub website: Option<String>,
    pub reviews: Option<Vec<PlaceReview>>,
    pub business_status: Option<String>,
    pub vicinity: Option<String>,
}
