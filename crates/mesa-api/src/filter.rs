use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::place::LatLng;

/// Cuisine categories offered for browsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CuisineType {
    Mexican,
    Italian,
    Burgers,
    Asian,
    International,
    Cafe,
    Steakhouse,
    Seafood,
    Healthy,
    Bar,
    FastFood,
    Regional,
}

impl CuisineType {
    pub const ALL: [CuisineType; 12] = [
        CuisineType::Mexican,
        CuisineType::Italian,
        CuisineType::Burgers,
        CuisineType::Asian,
        CuisineType::International,
        CuisineType::Cafe,
        CuisineType::Steakhouse,
        CuisineType::Seafood,
        CuisineType::Healthy,
        CuisineType::Bar,
        CuisineType::FastFood,
        CuisineType::Regional,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CuisineType::Mexican => "mexican",
            CuisineType::Italian => "italian",
            CuisineType::Burgers => "burgers",
            CuisineType::Asian => "asian",
            CuisineType::International => "international",
            CuisineType::Cafe => "cafe",
            CuisineType::Steakhouse => "steakhouse",
            CuisineType::Seafood => "seafood",
            CuisineType::Healthy => "healthy",
            CuisineType::Bar => "bar",
            CuisineType::FastFood => "fast_food",
            CuisineType::Regional => "regional",
        }
    }
}

impl fmt::Display for CuisineType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownCuisine(pub String);

impl fmt::Display for UnknownCuisine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unknown cuisine: {}", self.0)
    }
}

impl std::error::Error for UnknownCuisine {}

impl FromStr for CuisineType {
    type Err = UnknownCuisine;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CuisineType::ALL
            .into_iter()
            .find(|cuisine| cuisine.as_str() == s)
            .ok_or_else(|| UnknownCuisine(s.to_string()))
    }
}

/// Query plus client-side predicates for one result page.
///
/// Lives only as long as the page (or URL state) it describes; never persisted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterSet {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin: Option<LatLng>,
    /// Search radius in meters for nearby searches
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub radius_m: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cuisine: Option<CuisineType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_rating: Option<f64>,
    /// Acceptable price tiers (0-4). Empty means no price filter.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub price_levels: Vec<u8>,
    #[serde(default)]
    pub open_now: bool,
    #[serde(default)]
    pub delivery: bool,
    #[serde(default)]
    pub takeout: bool,
}

impl FilterSet {
    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    pub fn with_origin(mut self, origin: LatLng) -> Self {
        self.origin = Some(origin);
        self
    }

    pub fn with_min_rating(mut self, min_rating: f64) -> Self {
        self.min_rating = Some(min_rating);
        self
    }

    pub fn with_price_levels(mut self, levels: impl IntoIterator<Item = u8>) -> Self {
        self.price_levels = levels.into_iter().collect();
        self
    }

    pub fn with_cuisine(mut self, cuisine: CuisineType) -> Self {
        self.cuisine = Some(cuisine);
        self
    }

    /// Non-blank query text, trimmed.
    pub fn query_text(&self) -> Option<&str> {
        self.query
            .as_deref()
            .map(str::trim)
            .filter(|query| !query.is_empty())
    }

    pub fn has_service_flags(&self) -> bool {
        self.open_now || self.delivery || self.takeout
    }
}
