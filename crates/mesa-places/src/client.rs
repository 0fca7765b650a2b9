use async_trait::async_trait;
use tracing::{debug, error, info};

use mesa_api::{GatewayError, LatLng, Place};
use mesa_core::constants::DEFAULT_SEARCH_RADIUS_M;
use mesa_core::{SearchGateway, trace_context};

use super::converters::convert_results;
use super::models::{
    DETAILS_FIELDS, PlaceDetailsResponse, PlacesSearchResponse, STATUS_OK, STATUS_ZERO_RESULTS,
};

type Result<T> = std::result::Result<T, GatewayError>;

const BASE_URL: &str = "https://maps.googleapis.com/maps/api/place";

/// Place type requested by both search endpoints
const RESTAURANT_TYPE: &str = "restaurant";

pub struct PlacesClient {
    api_key: String,
    language: Option<String>,
    base_url: String,
    client: reqwest::Client,
}

impl PlacesClient {
    pub fn new(api_key: &str) -> Result<Self> {
        if api_key.trim().is_empty() {
            return Err(GatewayError::NotConfigured);
        }

        let mut builder = reqwest::Client::builder();
        #[cfg(not(target_arch = "wasm32"))]
        {
            builder = builder.timeout(std::time::Duration::from_secs(30));
        }
        let client = builder.build().map_err(|e| GatewayError::Transport {
            message: format!("Failed to create HTTP client: {}", e),
        })?;

        Ok(Self {
            api_key: api_key.to_string(),
            language: None,
            base_url: BASE_URL.to_string(),
            client,
        })
    }

    /// Language code forwarded to the service for localized names and reviews.
    pub fn with_language(mut self, language: Option<String>) -> Self {
        self.language = language.filter(|l| !l.is_empty());
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Helper to create better error messages from reqwest errors
    fn format_reqwest_error(e: reqwest::Error, url: &str, operation: &str) -> String {
        // The request URL carries the API key
        let e = e.without_url();
        if e.is_timeout() {
            format!(
                "Failed to {} for {}: timeout - request took too long (check network or increase timeout)",
                operation, url
            )
        } else if {
            #[cfg(not(target_arch = "wasm32"))]
            {
                e.is_connect()
            }
            #[cfg(target_arch = "wasm32")]
            {
                false // is_connect not available on WASM
            }
        } {
            format!(
                "Failed to {} for {}: connection error - check network connectivity, DNS resolution, and firewall settings. Error: {}",
                operation, url, e
            )
        } else if e.is_decode() {
            format!(
                "Failed to {} for {}: decode error - unexpected response format from server. Error: {}",
                operation, url, e
            )
        } else {
            format!("Failed to {} for {}: {}", operation, url, e)
        }
    }

    /// GET `{base}/{endpoint}/json` and return the body of a 2xx response.
    async fn get_json(&self, endpoint: &str, mut params: Vec<(&str, String)>) -> Result<String> {
        let url = format!("{}/{}/json", self.base_url, endpoint);
        if let Some(language) = &self.language {
            params.push(("language", language.clone()));
        }
        params.push(("key", self.api_key.clone()));

        let request = trace_context()
            .into_iter()
            .fold(self.client.get(&url), |request, (name, value)| {
                request.header(name, value)
            });
        let response = request
            .query(&params)
            .send()
            .await
            .map_err(|e| {
                let message = Self::format_reqwest_error(e, &url, endpoint);
                error!("[PlacesClient] Request failed: {}", message);
                GatewayError::Transport { message }
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| GatewayError::Transport {
            message: Self::format_reqwest_error(e, &url, "read response body"),
        })?;

        if !status.is_success() {
            let detail = if body.len() > 500 {
                format!("{}... (truncated)", body.chars().take(500).collect::<String>())
            } else {
                body
            };
            error!("[PlacesClient] HTTP {} from {}", status.as_u16(), url);
            return Err(GatewayError::Transport {
                message: format!("HTTP {} error from {}: {}", status.as_u16(), url, detail),
            });
        }

        Ok(body)
    }

    #[tracing::instrument(skip(self))]
    pub async fn text_search(&self, query: &str, origin: Option<LatLng>) -> Result<Vec<Place>> {
        let mut params = vec![
            ("query", query.to_string()),
            ("type", RESTAURANT_TYPE.to_string()),
        ];
        if let Some(origin) = origin {
            params.push(("location", format_location(origin)));
            params.push(("radius", DEFAULT_SEARCH_RADIUS_M.to_string()));
        }

        let body = self.get_json("textsearch", params).await?;
        let places = parse_search_response(&body)?;
        info!("[PlacesClient] Text search returned {} places", places.len());
        Ok(places)
    }

    #[tracing::instrument(skip(self))]
    pub async fn nearby_search(
        &self,
        origin: LatLng,
        radius_m: u32,
        place_type: Option<&str>,
    ) -> Result<Vec<Place>> {
        let params = vec![
            ("location", format_location(origin)),
            ("radius", radius_m.to_string()),
            ("type", place_type.unwrap_or(RESTAURANT_TYPE).to_string()),
        ];

        let body = self.get_json("nearbysearch", params).await?;
        let places = parse_search_response(&body)?;
        info!("[PlacesClient] Nearby search returned {} places", places.len());
        Ok(places)
    }

    #[tracing::instrument(skip(self))]
    pub async fn details(&self, place_id: &str) -> Result<Place> {
        let params = vec![
            ("place_id", place_id.to_string()),
            ("fields", DETAILS_FIELDS.join(",")),
        ];

        let body = self.get_json("details", params).await?;
        let place = parse_details_response(&body)?;
        debug!("[PlacesClient] Loaded details for {}", place.place_id);
        Ok(place)
    }

    /// URL of the photo endpoint for `photo_reference`. No request is made.
    pub fn photo_url(&self, photo_reference: &str, max_width: u32) -> String {
        let base = format!("{}/photo", self.base_url);
        let params = [
            ("maxwidth", max_width.to_string()),
            ("photo_reference", photo_reference.to_string()),
            ("key", self.api_key.clone()),
        ];
        match reqwest::Url::parse_with_params(&base, &params) {
            Ok(url) => url.to_string(),
            Err(_) => format!(
                "{}?maxwidth={}&photo_reference={}&key={}",
                base, max_width, photo_reference, self.api_key
            ),
        }
    }
}

fn format_location(origin: LatLng) -> String {
    format!("{},{}", origin.lat, origin.lng)
}

fn status_error(status: String, message: Option<String>) -> GatewayError {
    GatewayError::Status { status, message }
}

/// Decode a search response body. `ZERO_RESULTS` yields an empty list.
pub fn parse_search_response(body: &str) -> Result<Vec<Place>> {
    let response: PlacesSearchResponse =
        serde_json::from_str(body).map_err(|e| GatewayError::Decode {
            message: format!("Failed to parse search response: {}", e),
        })?;

    match response.status.as_str() {
        STATUS_OK => Ok(convert_results(response.results)),
        STATUS_ZERO_RESULTS => Ok(Vec::new()),
        _ => Err(status_error(response.status, response.error_message)),
    }
}

/// Decode a details response body. Any status other than `OK` is an error.
pub fn parse_details_response(body: &str) -> Result<Place> {
    let response: PlaceDetailsResponse =
        serde_json::from_str(body).map_err(|e| GatewayError::Decode {
            message: format!("Failed to parse details response: {}", e),
        })?;

    match (response.status.as_str(), response.result) {
        (STATUS_OK, Some(result)) => Place::try_from(result),
        (STATUS_OK, None) => Err(GatewayError::Decode {
            message: "details response has no result".to_string(),
        }),
        _ => Err(status_error(response.status, response.error_message)),
    }
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl SearchGateway for PlacesClient {
    async fn search_by_text(&self, query: &str, origin: Option<LatLng>) -> Result<Vec<Place>> {
        self.text_search(query, origin).await
    }

    async fn search_nearby(
        &self,
        origin: LatLng,
        radius_m: u32,
        category: Option<&str>,
    ) -> Result<Vec<Place>> {
        self.nearby_search(origin, radius_m, category).await
    }

    async fn get_details(&self, place_id: &str) -> Result<Place> {
        self.details(place_id).await
    }

    fn resolve_photo_url(&self, photo_reference: &str, max_width: u32) -> String {
        self.photo_url(photo_reference, max_width)
    }
}
