//! Gateway error taxonomy and its HTTP mapping

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde_json::{json, Value};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GatewayError {
    /// A required credential is not configured
    #[error("{0}")]
    ConfigMissing(String),

    /// A required request parameter is absent
    #[error("{0}")]
    Validation(String),

    /// Provider answered with a non-success status
    #[error("{message}")]
    Upstream { status: StatusCode, message: String },

    /// Provider answered with a non-success status; its body is relayed as-is
    #[error("upstream returned {status}")]
    UpstreamBody { status: StatusCode, body: Value },

    /// Network, decode or timeout failure. Carries the client-facing message only.
    #[error("{0}")]
    Transport(String),
}

impl GatewayError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::ConfigMissing(_) | Self::Transport(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Upstream { status, .. } | Self::UpstreamBody { status, .. } => *status,
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self {
            Self::UpstreamBody { body, .. } => json!({ "error": body }),
            other => json!({ "error": other.to_string() }),
        };
        (status, Json(body)).into_response()
    }
}

/// Convert a provider status into ours, falling back to 502 for codes axum can't represent.
pub fn relay_status(status: reqwest::StatusCode) -> StatusCode {
    StatusCode::from_u16(status.as_u16()).unwrap_or(StatusCode::BAD_GATEWAY)
}

/// Pull a human readable message out of a provider error body.
///
/// Understands the identity provider's `{"errors": [{"message", "long_message"}]}`
/// and the places provider's `{"error": {"message"}}` shapes.
pub fn extract_message(status: StatusCode, body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<Value>(body) {
        let candidates = [
            value.pointer("/errors/0/long_message"),
            value.pointer("/errors/0/message"),
            value.pointer("/error/message"),
            value.get("message"),
            value.get("error"),
        ];
        for candidate in candidates.into_iter().flatten() {
            if let Some(text) = candidate.as_str().filter(|s| !s.is_empty()) {
                return text.to_string();
            }
        }
    }

    let trimmed = body.trim();
    if !trimmed.is_empty() && !trimmed.starts_with('{') && !trimmed.starts_with('[') {
        return trimmed.to_string();
    }

    status
        .canonical_reason()
        .unwrap_or("Upstream request failed")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefers_long_message_from_identity_errors() {
        let body = r#"{"errors":[{"message":"not found","long_message":"User not found: user_1","code":"resource_not_found"}]}"#;
        assert_eq!(extract_message(StatusCode::NOT_FOUND, body), "User not found: user_1");
    }

    #[test]
    fn reads_places_error_message() {
        let body = r#"{"error":{"code":403,"message":"API key not valid","status":"PERMISSION_DENIED"}}"#;
        assert_eq!(extract_message(StatusCode::FORBIDDEN, body), "API key not valid");
    }

    #[test]
    fn falls_back_to_plain_text_then_reason() {
        assert_eq!(extract_message(StatusCode::BAD_GATEWAY, "upstream down"), "upstream down");
        assert_eq!(extract_message(StatusCode::TOO_MANY_REQUESTS, ""), "Too Many Requests");
        assert_eq!(extract_message(StatusCode::NOT_FOUND, r#"{"foo":1}"#), "Not Found");
    }

    #[test]
    fn statuses_follow_taxonomy() {
        assert_eq!(GatewayError::ConfigMissing("x".into()).status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(GatewayError::Validation("x".into()).status(), StatusCode::BAD_REQUEST);
        assert_eq!(GatewayError::Transport("x".into()).status(), StatusCode::INTERNAL_SERVER_ERROR);
        let upstream = GatewayError::Upstream {
            status: StatusCode::UNPROCESSABLE_ENTITY,
            message: "bad".into(),
        };
        assert_eq!(upstream.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn relay_status_keeps_code() {
        assert_eq!(relay_status(reqwest::StatusCode::NOT_FOUND), StatusCode::NOT_FOUND);
        assert_eq!(relay_status(reqwest::StatusCode::IM_A_TEAPOT), StatusCode::IM_A_TEAPOT);
    }
}
