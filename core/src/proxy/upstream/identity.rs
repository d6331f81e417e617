//! Identity provider client (user listing, deletion, role metadata)

use reqwest::{Client, StatusCode};
use serde_json::{json, Value};

use super::client::{endpoint, transport_failure, upstream_failure};
use crate::config::{IdentityConfig, IDENTITY_SECRET_ENV};
use crate::proxy::error::{relay_status, GatewayError};

const SERVICE: &str = "Identity";

#[derive(Clone)]
pub struct IdentityClient {
    http_client: Client,
    base_url: String,
    secret_key: Option<String>,
}

impl IdentityClient {
    pub fn new(http_client: Client, config: &IdentityConfig) -> Self {
        Self {
            http_client,
            base_url: config.base_url.clone(),
            secret_key: config.secret_key.clone(),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.secret_key.is_some()
    }

    fn secret_key(&self) -> Result<&str, GatewayError> {
        self.secret_key.as_deref().ok_or_else(|| {
            tracing::error!("{} is not set; refusing identity provider call", IDENTITY_SECRET_ENV);
            GatewayError::ConfigMissing(format!("{} is not configured", IDENTITY_SECRET_ENV))
        })
    }

    /// GET /users
    pub async fn list_users(&self) -> Result<Vec<Value>, GatewayError> {
        let secret = self.secret_key()?;
        let url = endpoint(&self.base_url, ["users"])?;

        let response = self.http_client
            .get(url)
            .bearer_auth(secret)
            .send()
            .await
            .map_err(|e| transport_failure("Failed to fetch users", e))?;

        if !response.status().is_success() {
            return Err(upstream_failure(SERVICE, response).await);
        }

        let users: Vec<Value> = response
            .json()
            .await
            .map_err(|e| transport_failure("Failed to fetch users", e))?;

        tracing::debug!("Fetched {} user(s) from identity provider", users.len());
        Ok(users)
    }

    /// DELETE /users/{id}. A failing provider body is relayed verbatim.
    pub async fn delete_user(&self, user_id: &str) -> Result<(), GatewayError> {
        let secret = self.secret_key()?;
        let url = endpoint(&self.base_url, ["users", user_id])?;

        let response = self.http_client
            .delete(url)
            .bearer_auth(secret)
            .send()
            .await
            .map_err(|e| transport_failure("Failed to delete user", e))?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let text = response.text().await.unwrap_or_default();
        tracing::error!("{} upstream error {} deleting {}: {}", SERVICE, status, user_id, text);

        let body = serde_json::from_str::<Value>(&text).unwrap_or_else(|_| {
            if text.trim().is_empty() {
                Value::String(reason(status))
            } else {
                Value::String(text)
            }
        });

        Err(GatewayError::UpstreamBody {
            status: relay_status(status),
            body,
        })
    }

    /// PATCH /users/{id} setting `public_metadata.role`
    pub async fn update_role(&self, user_id: &str, role: &str) -> Result<Value, GatewayError> {
        let secret = self.secret_key()?;
        let url = endpoint(&self.base_url, ["users", user_id])?;

        let response = self.http_client
            .patch(url)
            .bearer_auth(secret)
            .json(&json!({ "public_metadata": { "role": role } }))
            .send()
            .await
            .map_err(|e| transport_failure("Failed to update user role", e))?;

        if !response.status().is_success() {
            return Err(upstream_failure(SERVICE, response).await);
        }

        response
            .json()
            .await
            .map_err(|e| transport_failure("Failed to update user role", e))
    }
}

fn reason(status: StatusCode) -> String {
    status
        .canonical_reason()
        .unwrap_or("Upstream request failed")
        .to_string()
}
