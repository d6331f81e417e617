//! Places provider client (text search and photo media)

use reqwest::{Client, Response};
use serde_json::{json, Value};

use super::client::{endpoint, transport_failure, upstream_failure};
use crate::config::{PlacesConfig, PLACES_API_KEY_ENV};
use crate::proxy::error::GatewayError;

const SERVICE: &str = "Places";

/// Fields returned by text search
pub const SEARCH_FIELD_MASK: &str = "places.photos,places.displayName,places.id";
pub const FIELD_MASK_HEADER: &str = "X-Goog-FieldMask";
pub const API_KEY_HEADER: &str = "X-Goog-Api-Key";

pub const PHOTO_MAX_WIDTH_PX: u32 = 1000;
pub const PHOTO_MAX_HEIGHT_PX: u32 = 1000;

#[derive(Clone)]
pub struct PlacesClient {
    http_client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl PlacesClient {
    pub fn new(http_client: Client, config: &PlacesConfig) -> Self {
        Self {
            http_client,
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    fn api_key(&self) -> Result<&str, GatewayError> {
        self.api_key.as_deref().ok_or_else(|| {
            tracing::error!("{} is not set; refusing places provider call", PLACES_API_KEY_ENV);
            GatewayError::ConfigMissing(format!("{} is not configured", PLACES_API_KEY_ENV))
        })
    }

    /// GET /{photoRef}/media. Returns the successful response so the caller can stream it.
    ///
    /// `photo_ref` is a resource name such as `places/ID/photos/REF`.
    pub async fn fetch_photo(&self, photo_ref: &str) -> Result<Response, GatewayError> {
        let segments = photo_segments(photo_ref)?;
        let api_key = self.api_key()?;

        let mut url = endpoint(&self.base_url, segments.into_iter().chain(std::iter::once("media")))?;
        url.query_pairs_mut()
            .append_pair("maxHeightPx", &PHOTO_MAX_HEIGHT_PX.to_string())
            .append_pair("maxWidthPx", &PHOTO_MAX_WIDTH_PX.to_string())
            .append_pair("key", api_key);

        let response = self.http_client
            .get(url)
            .send()
            .await
            .map_err(|e| transport_failure("Failed to fetch photo", e))?;

        if !response.status().is_success() {
            return Err(upstream_failure(SERVICE, response).await);
        }

        Ok(response)
    }

    /// POST /places:searchText restricted to [`SEARCH_FIELD_MASK`]
    pub async fn search_text(&self, text_query: Option<&Value>) -> Result<Value, GatewayError> {
        let api_key = self.api_key()?;
        let url = endpoint(&self.base_url, ["places:searchText"])?;

        let body = json!({ "textQuery": text_query.cloned().unwrap_or(Value::Null) });

        let response = self.http_client
            .post(url)
            .header(API_KEY_HEADER, api_key)
            .header(FIELD_MASK_HEADER, SEARCH_FIELD_MASK)
            .json(&body)
            .send()
            .await
            .map_err(|e| transport_failure("Failed to search places", e))?;

        if !response.status().is_success() {
            return Err(upstream_failure(SERVICE, response).await);
        }

        response
            .json()
            .await
            .map_err(|e| transport_failure("Failed to search places", e))
    }
}

/// Split a photo resource name into path segments. Dot segments are refused.
fn photo_segments(photo_ref: &str) -> Result<Vec<&str>, GatewayError> {
    let segments: Vec<&str> = photo_ref.split('/').filter(|s| !s.is_empty()).collect();

    if segments.is_empty() || segments.iter().any(|s| *s == "." || *s == "..") {
        tracing::warn!("Rejected photoRef {:?}", photo_ref);
        return Err(GatewayError::Validation("photoRef is invalid".to_string()));
    }

    Ok(segments)
}
