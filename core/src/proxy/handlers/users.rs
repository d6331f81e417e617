//! User administration handlers
//! Handles /api/getUsers, /api/deleteUser/:id, /api/changeUserRole/:id, /api/getActiveUsers

use axum::{
    extract::{Path, State},
    response::Json,
};
use bytes::Bytes;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::proxy::activity::count_active;
use crate::proxy::error::GatewayError;
use crate::proxy::server::AppState;

#[derive(Debug, Deserialize)]
struct RoleChange {
    #[serde(default)]
    role: Option<String>,
}

/// Handle GET /api/getUsers
pub async fn handle_get_users(
    State(state): State<AppState>,
) -> Result<Json<Vec<Value>>, GatewayError> {
    let users = state.identity.list_users().await?;
    Ok(Json(users))
}

/// Handle DELETE /api/deleteUser/:id
pub async fn handle_delete_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<Value>, GatewayError> {
    state.identity.delete_user(&user_id).await?;
    tracing::info!("Deleted user {}", user_id);

    Ok(Json(json!({
        "success": true,
        "message": "User deleted successfully"
    })))
}

/// Handle PATCH /api/changeUserRole/:id
///
/// The body is parsed leniently: anything without a non-empty `role` string is a 400.
pub async fn handle_change_user_role(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    body: Bytes,
) -> Result<Json<Value>, GatewayError> {
    let role = serde_json::from_slice::<RoleChange>(&body)
        .ok()
        .and_then(|change| change.role)
        .filter(|role| !role.trim().is_empty())
        .ok_or_else(|| GatewayError::Validation("Role is required".to_string()))?;

    let updated = state.identity.update_role(&user_id, &role).await?;
    tracing::info!("Changed role of user {} to {}", user_id, role);

    Ok(Json(updated))
}

/// Handle GET /api/getActiveUsers
pub async fn handle_get_active_users(
    State(state): State<AppState>,
) -> Result<Json<Value>, GatewayError> {
    let users = state.identity.list_users().await?;
    let count = count_active(&users, chrono::Utc::now());

    tracing::debug!("{} of {} user(s) active", count, users.len());
    Ok(Json(json!({ "count": count })))
}
