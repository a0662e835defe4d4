use axum::{
    Router, middleware,
    routing::{get, post},
};

use crate::{
    infra::app_state::AppState,
    users::{auth, role_handlers},
};

/// Create all v1 API routes
pub fn create_v1_router(state: AppState) -> Router<AppState> {
    Router::new()
        // Public authentication endpoints
        .route("/auth/register", post(auth::handlers::register))
        .route("/auth/login", post(auth::handlers::login))
        // Merge protected routes
        .merge(create_protected_routes(state.clone()))
        // Merge admin routes
        .merge(create_admin_routes(state))
}

/// Create protected routes that require authentication
fn create_protected_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/auth/logout", post(auth::handlers::logout))
        .route("/auth/me", get(auth::handlers::get_current_user))
        .route_layer(middleware::from_fn_with_state(
            state,
            auth::middleware::auth_middleware,
        ))
}

/// Create admin routes; auth runs first, then the admin guard
fn create_admin_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/users/{username}/role",
            post(role_handlers::change_role_handler),
        )
        .route_layer(middleware::from_fn(auth::middleware::require_admin))
        .route_layer(middleware::from_fn_with_state(
            state,
            auth::middleware::auth_middleware,
        ))
}
