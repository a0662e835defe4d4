//! # Keygate Server
//!
//! Bearer session credential service for user management.
//!
//! ## Overview
//!
//! - **Hybrid tokens**: signed JWTs cross-checked against a Redis liveness
//!   record, so logout and role changes revoke immediately
//! - **User management**: registration, login with session reuse, profile
//!   lookup, admin role changes
//!
//! ## Architecture
//!
//! The server is built on Axum and uses:
//! - PostgreSQL as the user directory
//! - Redis for session liveness records

use std::{net::SocketAddr, sync::Arc};

use anyhow::Context;
use axum::{Json, Router, http::HeaderValue, routing::get};
use serde_json::{Value, json};
use tower_http::{
    cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use keygate_core::{database::PostgresDirectory, session::RedisSessionStore};
use keygate_server::{AppState, infra::config::Config, routes};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Arc::new(Config::from_env().context("failed to load configuration")?);

    let directory = Arc::new(
        PostgresDirectory::connect(&config.database_url)
            .await
            .context("failed to connect to user directory")?,
    );
    let sessions = Arc::new(
        RedisSessionStore::new(&config.redis_url)
            .await
            .context("failed to connect to session store")?,
    );

    let state = AppState::new(config.clone(), directory, sessions)
        .context("failed to initialize credential services")?;

    let app = create_app(state);

    let addr: SocketAddr = format!("{}:{}", config.server_host, config.server_port)
        .parse()
        .context("invalid server address")?;

    info!("Starting Keygate server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn create_app(state: AppState) -> Router {
    let cors = if state.config.cors_allowed_origins.is_empty() {
        CorsLayer::new()
            .allow_origin(AllowOrigin::any())
            .allow_methods(AllowMethods::any())
            .allow_headers(AllowHeaders::any())
    } else {
        let origins: Vec<HeaderValue> = state
            .config
            .cors_allowed_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(AllowMethods::any())
            .allow_headers(AllowHeaders::any())
    };

    Router::new()
        .route("/", get(root))
        .merge(routes::create_api_router(state.clone()))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

async fn root() -> Json<Value> {
    Json(json!({ "message": "Keygate session credential service" }))
}
