//! Role management endpoints.

use axum::{
    Extension, Json,
    extract::{Path, State},
};
use tracing::info;

use keygate_core::{
    api_types::ApiResponse,
    error::CoreError,
    user::{ChangeRoleRequest, User},
};

use crate::infra::{
    app_state::AppState,
    errors::{AppError, AppResult},
};

/// Change a user's role, then revoke their live token.
///
/// Revocation forces the next request to re-authenticate and pick up the new
/// role from the directory.
///
/// Requires: admin (enforced by middleware)
pub async fn change_role_handler(
    State(state): State<AppState>,
    Path(username): Path<String>,
    Extension(admin): Extension<User>,
    Json(request): Json<ChangeRoleRequest>,
) -> AppResult<Json<ApiResponse<()>>> {
    let username = username.to_lowercase();

    state
        .directory
        .update_role(&username, request.role)
        .await
        .map_err(|e| match e {
            CoreError::NotFound(_) => AppError::not_found("User not found"),
            other => other.into(),
        })?;

    state.issuer.revoke(&username).await?;

    info!(
        admin = %admin.username,
        username = %username,
        role = %request.role,
        "changed user role"
    );

    Ok(Json(
        ApiResponse::success(()).with_message(format!("Role changed to {}", request.role)),
    ))
}
