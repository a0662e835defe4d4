use axum::{Extension, Json, extract::State, http::StatusCode};
use tracing::info;

use keygate_core::{
    api_types::ApiResponse,
    auth::password,
    error::CoreError,
    user::{AuthToken, LoginRequest, NewUser, RegisterRequest, Role, User},
};

use crate::infra::{
    app_state::AppState,
    errors::{AppError, AppResult},
};

pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<()>>)> {
    request
        .validate()
        .map_err(|e| AppError::bad_request(format!("Validation error: {}", e)))?;

    let username = request.username.to_lowercase();

    // Check if username or email already exists
    if state.directory.find_by_username(&username).await?.is_some() {
        return Err(AppError::conflict("Username already registered"));
    }
    if state
        .directory
        .find_by_email(&request.email)
        .await?
        .is_some()
    {
        return Err(AppError::conflict("Email already registered"));
    }

    let password_hash = password::hash(&request.password)
        .map_err(|_| AppError::internal("Failed to hash password"))?;

    let user = NewUser {
        username,
        email: request.email,
        password_hash,
        role: Role::User,
    };

    let created = state
        .directory
        .create_user(&user)
        .await
        .map_err(|e| match e {
            CoreError::Conflict(msg) => AppError::conflict(msg),
            other => other.into(),
        })?;

    info!(username = %created.username, "registered new user");

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(()).with_message("User created successfully".to_string())),
    ))
}

pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> AppResult<Json<ApiResponse<AuthToken>>> {
    let user = state
        .directory
        .find_by_username(&request.username.to_lowercase())
        .await?
        .ok_or_else(|| AppError::unauthorized("Incorrect username or password"))?;

    if !password::verify(&request.password, &user.password_hash) {
        return Err(AppError::unauthorized("Incorrect username or password"));
    }

    // Reuse the live session if one exists; repeated logins must not churn
    // the liveness record.
    if let Some(token) = state.issuer.live(&user.username).await? {
        return Ok(Json(ApiResponse::success(token)));
    }

    let token = state.issuer.issue(&user.username).await?;

    info!(username = %user.username, "user logged in");

    Ok(Json(ApiResponse::success(token)))
}

/// Revoke the caller's live token.
///
/// The bearer token is unusable afterwards even though it stays
/// cryptographically valid until its embedded expiry.
pub async fn logout(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
) -> Result<StatusCode, AppError> {
    state.issuer.revoke(&user.username).await?;

    info!(username = %user.username, "user logged out");

    Ok(StatusCode::NO_CONTENT)
}

pub async fn get_current_user(
    Extension(user): Extension<User>,
) -> AppResult<Json<ApiResponse<User>>> {
    Ok(Json(ApiResponse::success(user)))
}
