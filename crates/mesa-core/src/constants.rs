use mesa_api::LatLng;

pub const DEFAULT_SEARCH_RADIUS_M: u32 = 5_000;
pub const MAX_SEARCH_RADIUS_M: u32 = 50_000;

pub const DEFAULT_MAP_CENTER: LatLng = LatLng {
    lat: 19.4326,
    lng: -99.1332,
};
pub const DEFAULT_MAP_ZOOM: u8 = 13;

pub const MAX_RATING: f64 = 5.0;

/// Results revealed per pagination step
pub const DEFAULT_PAGE_SIZE: usize = 12;

/// Photo width used for favorite snapshots and list cards
pub const DEFAULT_PHOTO_MAX_WIDTH: u32 = 400;

pub const MAX_RESULTS: usize = 20;
pub const MAX_PHOTOS_PER_PLACE: usize = 10;
pub const MAX_REVIEWS_DISPLAYED: usize = 10;

/// Local device store key holding the favorites array
pub const DEFAULT_FAVORITES_KEY: &str = "mesa_favorites";

/// Place types that count as food establishments
pub const FOOD_ESTABLISHMENT_TYPES: [&str; 7] = [
    "restaurant",
    "cafe",
    "meal_delivery",
    "meal_takeaway",
    "bakery",
    "bar",
    "food",
];

pub const DAYS_OF_WEEK: [&str; 7] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriceLevelInfo {
    pub level: u8,
    pub symbol: &'static str,
    pub label: &'static str,
}

pub const PRICE_LEVELS: [PriceLevelInfo; 5] = [
    PriceLevelInfo {
        level: 0,
        symbol: "Free",
        label: "Free",
    },
    PriceLevelInfo {
        level: 1,
        symbol: "$",
        label: "Inexpensive",
    },
    PriceLevelInfo {
        level: 2,
        symbol: "$$",
        label: "Moderate",
    },
    PriceLevelInfo {
        level: 3,
        symbol: "$$$",
        label: "Expensive",
    },
    PriceLevelInfo {
        level: 4,
        symbol: "$$$$",
        label: "Very expensive",
    },
];

pub fn is_food_establishment(types: Option<&[String]>) -> bool {
    types.is_some_and(|types| {
        types
            .iter()
            .any(|t| FOOD_ESTABLISHMENT_TYPES.contains(&t.as_str()))
    })
}
