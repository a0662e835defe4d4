use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};

use keygate_core::user::User;

use crate::infra::{app_state::AppState, errors::AppError};

/// Validate the bearer token and expose the resolved identity to downstream
/// handlers via request extensions.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = extract_bearer_token(&request)?;
    let user = state.validator.validate(&token).await?;

    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

/// Middleware that ensures the authenticated user is an administrator.
/// This middleware must be run AFTER auth_middleware in the layer stack.
pub async fn require_admin(request: Request, next: Next) -> Result<Response, AppError> {
    let user = request
        .extensions()
        .get::<User>()
        .ok_or_else(|| AppError::unauthorized("Authentication required"))?;

    if !user.role.can_manage_users() {
        return Err(AppError::forbidden("Not enough permissions"));
    }

    Ok(next.run(request).await)
}

fn extract_bearer_token(request: &Request) -> Result<String, AppError> {
    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| AppError::unauthorized("Invalid authentication credentials"))?;

    if !auth_header.starts_with("Bearer ") {
        return Err(AppError::unauthorized("Invalid authentication credentials"));
    }

    Ok(auth_header[7..].to_string())
}
