use std::sync::Arc;
use tracing::{debug, info};

use mesa_api::{FilterSet, GatewayError, LatLng, Place};
use mesa_core::constants::{DEFAULT_PHOTO_MAX_WIDTH, DEFAULT_SEARCH_RADIUS_M, MAX_SEARCH_RADIUS_M};
use mesa_core::{SearchGateway, category};

use super::filter::{apply, sort_by_distance};

/// Place type requested from nearby search
const NEARBY_CATEGORY: &str = "restaurant";

/// Which gateway call a filter set resolves to.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchPlan {
    Text {
        query: String,
        origin: Option<LatLng>,
    },
    Nearby {
        origin: LatLng,
        radius_m: u32,
    },
    Nothing,
}

pub struct SearchService {
    gateway: Arc<dyn SearchGateway>,
    default_radius_m: u32,
}

impl SearchService {
    pub fn new(gateway: Arc<dyn SearchGateway>) -> Self {
        Self {
            gateway,
            default_radius_m: DEFAULT_SEARCH_RADIUS_M,
        }
    }

    pub fn with_default_radius(mut self, radius_m: u32) -> Self {
        self.default_radius_m = radius_m.clamp(1, MAX_SEARCH_RADIUS_M);
        self
    }

    pub fn gateway(&self) -> &Arc<dyn SearchGateway> {
        &self.gateway
    }

    /// Free text first, then the cuisine's primary search term, then nearby search around the origin.
    pub fn plan(&self, filters: &FilterSet) -> SearchPlan {
        if let Some(query) = filters.query_text() {
            return SearchPlan::Text {
                query: query.to_string(),
                origin: filters.origin,
            };
        }
        if let Some(cuisine) = filters.cuisine {
            return SearchPlan::Text {
                query: category(cuisine).primary_search_term().to_string(),
                origin: filters.origin,
            };
        }
        match filters.origin {
            Some(origin) => SearchPlan::Nearby {
                origin,
                radius_m: filters
                    .radius_m
                    .unwrap_or(self.default_radius_m)
                    .min(MAX_SEARCH_RADIUS_M),
            },
            None => SearchPlan::Nothing,
        }
    }

    /// Run the planned gateway call and apply the client-side filters.
    #[tracing::instrument(skip(self))]
    pub async fn search(&self, filters: &FilterSet) -> Result<Vec<Place>, GatewayError> {
        let results = match self.plan(filters) {
            SearchPlan::Text { query, origin } => {
                self.gateway.search_by_text(&query, origin).await?
            }
            SearchPlan::Nearby { origin, radius_m } => {
                self.gateway
                    .search_nearby(origin, radius_m, Some(NEARBY_CATEGORY))
                    .await?
            }
            SearchPlan::Nothing => {
                debug!("[SearchService] No query, cuisine or origin; nothing to search");
                return Ok(Vec::new());
            }
        };

        if filters.has_service_flags() {
            // List responses carry no reliable open-now, delivery or takeout data
            debug!(
                "[SearchService] Ignoring service flags open_now={} delivery={} takeout={}",
                filters.open_now, filters.delivery, filters.takeout
            );
        }

        let filtered = apply(&results, filters);
        info!(
            "[SearchService] {} results, {} after filters",
            results.len(),
            filtered.len()
        );
        Ok(filtered)
    }

    pub async fn by_text(
        &self,
        query: &str,
        origin: Option<LatLng>,
    ) -> Result<Vec<Place>, GatewayError> {
        self.gateway.search_by_text(query, origin).await
    }

    pub async fn nearby(
        &self,
        origin: LatLng,
        radius_m: Option<u32>,
    ) -> Result<Vec<Place>, GatewayError> {
        let radius_m = radius_m
            .unwrap_or(self.default_radius_m)
            .min(MAX_SEARCH_RADIUS_M);
        self.gateway
            .search_nearby(origin, radius_m, Some(NEARBY_CATEGORY))
            .await
    }

    pub async fn details(&self, place_id: &str) -> Result<Place, GatewayError> {
        self.gateway.get_details(place_id).await
    }

    /// URL of the place's first photo at list-card width.
    pub fn photo_url(&self, place: &Place) -> Option<String> {
        place
            .primary_photo()
            .map(|photo| {
                self.gateway
                    .resolve_photo_url(&photo.photo_reference, DEFAULT_PHOTO_MAX_WIDTH)
            })
            .or_else(|| place.photo_url.clone())
    }

    /// `search`, then nearest first when the filter set has an origin.
    pub async fn search_sorted(&self, filters: &FilterSet) -> Result<Vec<Place>, GatewayError> {
        let mut results = self.search(filters).await?;
        if let Some(origin) = filters.origin {
            sort_by_distance(&mut results, origin);
        }
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mesa_api::CuisineType;
    use mesa_places::{FakePlacesGateway, GatewayCall};

    const CENTRO: LatLng = LatLng {
        lat: 19.4326,
        lng: -99.1332,
    };

    fn service() -> (Arc<FakePlacesGateway>, SearchService) {
        let gateway = Arc::new(FakePlacesGateway::with_places(vec![
            Place::new("p1", "Taquería Los Cocuyos", "Bolívar 56", LatLng::new(19.4310, -99.1370))
                .with_rating(4.6)
                .with_price_level(1)
                .with_types(["restaurant", "food"]),
            Place::new("p2", "Sushi Roll", "Madero 1", LatLng::new(19.4340, -99.1390))
                .with_rating(3.8)
                .with_types(["restaurant"]),
        ]));
        (gateway.clone(), SearchService::new(gateway))
    }

    #[test]
    fn test_plan_precedence() {
        let (_, service) = service();

        assert_eq!(
            service.plan(&FilterSet::default().with_query("  tacos ").with_cuisine(CuisineType::Asian)),
            SearchPlan::Text {
                query: "tacos".to_string(),
                origin: None
            }
        );
        assert_eq!(
            service.plan(&FilterSet::default().with_cuisine(CuisineType::Seafood)),
            SearchPlan::Text {
                query: "seafood restaurant".to_string(),
                origin: None
            }
        );

        let mut far = FilterSet::default().with_origin(CENTRO);
        far.radius_m = Some(80_000);
        assert_eq!(
            service.plan(&far),
            SearchPlan::Nearby {
                origin: CENTRO,
                radius_m: MAX_SEARCH_RADIUS_M
            }
        );
        assert_eq!(service.plan(&FilterSet::default()), SearchPlan::Nothing);
    }

    #[tokio::test]
    async fn test_empty_filter_does_not_call_gateway() {
        let (gateway, service) = service();
        assert!(service.search(&FilterSet::default()).await.unwrap().is_empty());
        assert!(gateway.calls().is_empty());
    }

    #[tokio::test]
    async fn test_nearby_search_uses_default_radius_and_filters() {
        let (gateway, service) = service();
        let results = service
            .search(&FilterSet::default().with_origin(CENTRO).with_min_rating(4.0))
            .await
            .unwrap();

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].place_id, "p1");
        assert_eq!(
            gateway.calls(),
            vec![GatewayCall::Nearby {
                origin: CENTRO,
                radius_m: DEFAULT_SEARCH_RADIUS_M,
                category: Some("restaurant".to_string()),
            }]
        );
    }

    #[tokio::test]
    async fn test_service_flags_do_not_filter() {
        let (_, service) = service();
        let mut filters = FilterSet::default().with_query("restaurant");
        filters.open_now = true;
        filters.delivery = true;
        assert_eq!(service.search(&filters).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_gateway_errors_propagate() {
        let (gateway, service) = service();
        gateway.fail_with(GatewayError::Status {
            status: "OVER_QUERY_LIMIT".to_string(),
            message: None,
        });
        assert!(service
            .search(&FilterSet::default().with_query("tacos"))
            .await
            .is_err());
    }

    #[tokio::test]
    async fn test_search_sorted_nearest_first() {
        let (_, service) = service();
        let results = service
            .search_sorted(&FilterSet::default().with_query("restaurant").with_origin(CENTRO))
            .await
            .unwrap();
        let ids: Vec<&str> = results.iter().map(|p| p.place_id.as_str()).collect();
        assert_eq!(ids, vec!["p1", "p2"]);
    }
}
