use async_trait::async_trait;
use reqwest::StatusCode;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde::Deserialize;
use serde_json::{Map, Value, json};
use tracing::{debug, error, info, warn};

use mesa_api::{Favorite, PersistenceError};
use mesa_core::{CloudDocumentStore, MaybeSendSync, trace_context};

use crate::config::FirebaseConfig;
use crate::value::{SAVED_AT_FIELD, favorite_from_fields, favorite_to_fields};

type Result<T> = std::result::Result<T, PersistenceError>;

const USERS_COLLECTION: &str = "users";
const FAVORITES_COLLECTION: &str = "favorites";

/// Supplies the bearer credential for document requests.
pub trait TokenSource: MaybeSendSync {
    fn id_token(&self) -> Option<String>;
}

/// Fixed token, typically read from configuration.
pub struct StaticTokenSource(Option<String>);

impl StaticTokenSource {
    pub fn new(token: Option<String>) -> Self {
        Self(token.filter(|t| !t.is_empty()))
    }
}

impl TokenSource for StaticTokenSource {
    fn id_token(&self) -> Option<String> {
        self.0.clone()
    }
}

#[derive(Debug, Deserialize)]
struct Document {
    #[serde(default)]
    name: String,
    #[serde(default)]
    fields: Map<String, Value>,
}

/// One element of a `runQuery` response. Elements without a document only carry the read time.
#[derive(Debug, Deserialize)]
struct RunQueryItem {
    #[serde(default)]
    document: Option<Document>,
}

pub struct FirestoreClient {
    documents_url: String,
    api_key: String,
    tokens: Box<dyn TokenSource>,
    client: reqwest::Client,
}

impl FirestoreClient {
    pub fn new(config: &FirebaseConfig, tokens: Box<dyn TokenSource>) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        #[cfg(not(target_arch = "wasm32"))]
        {
            builder = builder.timeout(std::time::Duration::from_secs(30));
        }
        let client = builder
            .build()
            .map_err(|e| PersistenceError::backend(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            documents_url: config.documents_url(),
            api_key: config.api_key.clone(),
            tokens,
            client,
        })
    }

    pub fn with_documents_url(mut self, documents_url: impl Into<String>) -> Self {
        self.documents_url = documents_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Document URL below the database root, one percent-encoded segment per id.
    fn document_url(&self, segments: &[&str]) -> Result<String> {
        let invalid = || {
            PersistenceError::backend(format!("Invalid documents URL: {}", self.documents_url))
        };
        let mut url = reqwest::Url::parse(&self.documents_url).map_err(|_| invalid())?;
        url.path_segments_mut()
            .map_err(|_| invalid())?
            .extend(segments);
        Ok(url.to_string())
    }

    fn favorite_url(&self, uid: &str, place_id: &str) -> Result<String> {
        self.document_url(&[USERS_COLLECTION, uid, FAVORITES_COLLECTION, place_id])
    }

    fn headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        if let Some(token) = self.tokens.id_token() {
            if let Ok(value) = format!("Bearer {}", token).parse() {
                headers.insert("Authorization", value);
            }
        }

        for (name, value) in trace_context() {
            if let (Ok(name), Ok(value)) = (
                HeaderName::from_bytes(name.as_bytes()),
                HeaderValue::from_str(&value),
            ) {
                headers.insert(name, value);
            }
        }
        headers
    }

    fn request(&self, method: reqwest::Method, url: &str) -> reqwest::RequestBuilder {
        self.client
            .request(method, url)
            .headers(self.headers())
            .query(&[("key", self.api_key.as_str())])
    }

    fn map_send_error(e: reqwest::Error, url: &str, operation: &str) -> PersistenceError {
        let e = e.without_url();
        let connectivity = e.is_timeout() || {
            #[cfg(not(target_arch = "wasm32"))]
            {
                e.is_connect()
            }
            #[cfg(target_arch = "wasm32")]
            {
                false // is_connect not available on WASM
            }
        };
        let message = format!("Failed to {} for {}: {}", operation, url, e);
        error!("[FirestoreClient] {}", message);
        if connectivity {
            PersistenceError::Unreachable { message }
        } else {
            PersistenceError::Backend { message }
        }
    }

    /// Map a non-success response to the error taxonomy.
    async fn status_error(response: reqwest::Response, url: &str) -> PersistenceError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        let message = format!(
            "HTTP {} error from {}: {}",
            status.as_u16(),
            url,
            body.chars().take(500).collect::<String>()
        );
        error!("[FirestoreClient] {}", message);
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                PersistenceError::PermissionDenied { message }
            }
            StatusCode::SERVICE_UNAVAILABLE | StatusCode::GATEWAY_TIMEOUT => {
                PersistenceError::Unreachable { message }
            }
            _ => PersistenceError::Backend { message },
        }
    }

    #[tracing::instrument(skip(self, record))]
    pub async fn put_favorite(&self, uid: &str, place_id: &str, record: &Favorite) -> Result<()> {
        let url = self.favorite_url(uid, place_id)?;
        let body = json!({ "fields": favorite_to_fields(record)? });

        let response = self
            .request(reqwest::Method::PATCH, &url)
            .json(&body)
            .send()
            .await
            .map_err(|e| Self::map_send_error(e, &url, "write favorite"))?;

        if !response.status().is_success() {
            return Err(Self::status_error(response, &url).await);
        }

        info!("[FirestoreClient] Saved favorite {} for {}", place_id, uid);
        Ok(())
    }

    #[tracing::instrument(skip(self))]
    pub async fn delete_favorite(&self, uid: &str, place_id: &str) -> Result<()> {
        let url = self.favorite_url(uid, place_id)?;

        let response = self
            .request(reqwest::Method::DELETE, &url)
            .send()
            .await
            .map_err(|e| Self::map_send_error(e, &url, "delete favorite"))?;

        match response.status() {
            status if status.is_success() => {
                info!("[FirestoreClient] Removed favorite {} for {}", place_id, uid);
                Ok(())
            }
            StatusCode::NOT_FOUND => {
                debug!("[FirestoreClient] Favorite {} already absent", place_id);
                Ok(())
            }
            _ => Err(Self::status_error(response, &url).await),
        }
    }

    #[tracing::instrument(skip(self))]
    pub async fn list_favorites(&self, uid: &str) -> Result<Vec<Favorite>> {
        let run_query = format!("{}:runQuery", uid);
        let url = self.document_url(&[USERS_COLLECTION, run_query.as_str()])?;
        let body = json!({
            "structuredQuery": {
                "from": [{ "collectionId": FAVORITES_COLLECTION }],
                "orderBy": [{
                    "field": { "fieldPath": SAVED_AT_FIELD },
                    "direction": "DESCENDING"
                }]
            }
        });

        let response = self
            .request(reqwest::Method::POST, &url)
            .json(&body)
            .send()
            .await
            .map_err(|e| Self::map_send_error(e, &url, "list favorites"))?;

        if !response.status().is_success() {
            return Err(Self::status_error(response, &url).await);
        }

        let text = response
            .text()
            .await
            .map_err(|e| Self::map_send_error(e, &url, "read response body"))?;
        let favorites = parse_run_query_response(&text)?;
        info!("[FirestoreClient] Loaded {} favorites for {}", favorites.len(), uid);
        Ok(favorites)
    }
}

/// Decode a `runQuery` response body, keeping the server's order.
///
/// Documents that do not decode as favorites are skipped with a warning.
pub fn parse_run_query_response(body: &str) -> Result<Vec<Favorite>> {
    let items: Vec<RunQueryItem> = serde_json::from_str(body)?;

    Ok(items
        .into_iter()
        .filter_map(|item| item.document)
        .filter_map(|document| match favorite_from_fields(&document.fields) {
            Ok(favorite) => Some(favorite),
            Err(e) => {
                warn!("[FirestoreClient] Skipping document {}: {}", document.name, e);
                None
            }
        })
        .collect())
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl CloudDocumentStore for FirestoreClient {
    async fn put(&self, uid: &str, place_id: &str, record: &Favorite) -> Result<()> {
        self.put_favorite(uid, place_id, record).await
    }

    async fn delete(&self, uid: &str, place_id: &str) -> Result<()> {
        self.delete_favorite(uid, place_id).await
    }

    async fn list_ordered_by_saved_at_desc(&self, uid: &str) -> Result<Vec<Favorite>> {
        self.list_favorites(uid).await
    }
}
