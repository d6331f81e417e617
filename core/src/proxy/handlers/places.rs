//! Places handlers
//! Handles /api/place-photo and /api/place-details

use axum::{
    body::Body,
    extract::{Query, State},
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Json, Response},
};
use bytes::Bytes;
use futures::TryStreamExt;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::proxy::error::GatewayError;
use crate::proxy::server::AppState;

const FALLBACK_IMAGE_TYPE: &str = "image/jpeg";

#[derive(Debug, Deserialize)]
pub struct PhotoQuery {
    #[serde(rename = "photoRef")]
    photo_ref: Option<String>,
}

/// Handle GET /api/place-photo?photoRef=...
///
/// Streams the provider's image through without buffering it.
pub async fn handle_place_photo(
    State(state): State<AppState>,
    Query(query): Query<PhotoQuery>,
) -> Result<Response, GatewayError> {
    let photo_ref = query
        .photo_ref
        .filter(|r| !r.trim().is_empty())
        .ok_or_else(|| GatewayError::Validation("photoRef is required".to_string()))?;

    let upstream = state.places.fetch_photo(&photo_ref).await?;

    let content_type = upstream
        .headers()
        .get(header::CONTENT_TYPE)
        .cloned()
        .unwrap_or_else(|| HeaderValue::from_static(FALLBACK_IMAGE_TYPE));

    let stream = upstream
        .bytes_stream()
        .inspect_err(|e| tracing::warn!("Photo stream interrupted: {}", e));

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type)
        .header("cross-origin-resource-policy", "cross-origin")
        .body(Body::from_stream(stream))
        .map_err(|e| {
            tracing::error!("Failed to build photo response: {}", e);
            GatewayError::Transport("Failed to fetch photo".to_string())
        })
}

/// Handle POST /api/place-details
///
/// Every failure collapses into a 500 with a `message` body.
pub async fn handle_place_details(
    State(state): State<AppState>,
    body: Bytes,
) -> Response {
    let request: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);
    let text_query = request.get("textQuery");

    match state.places.search_text(text_query).await {
        Ok(result) => Json(result).into_response(),
        Err(e) => {
            tracing::error!("Place details lookup failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "message": "Error fetching place details" })),
            )
                .into_response()
        }
    }
}
