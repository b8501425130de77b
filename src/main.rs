//! Bankify Server - Main Application Entry Point
//!
//! A REST API for a personal banking app: users sign up, link bank accounts
//! and send money to other users identified by a signed, sharable account id.
//!
//! # Architecture
//!
//! - **Web Framework**: Axum (async HTTP server)
//! - **Database**: PostgreSQL with sqlx (async queries)
//! - **Authentication**: sessions issued by an Appwrite-compatible auth provider
//! - **Billing**: Stripe connected accounts
//! - **Money movement**: Dwolla transfers between funding sources
//!
//! # Startup Flow
//!
//! 1. Load configuration from environment variables
//! 2. Create database connection pool and run migrations
//! 3. Build the outbound HTTP clients
//! 4. Build HTTP router with routes and middleware
//! 5. Start server on configured port

mod clients;
mod codec;
mod config;
mod db;
mod error;
mod handlers;
mod middleware;
mod models;
mod routes;
mod services;
mod state;
mod store;
#[cfg(test)]
mod test_utils;

use std::{sync::Arc, time::Duration};

use axum::http::{HeaderValue, Method, header};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing_subscriber::EnvFilter;

use crate::{
    clients::{AppwriteClient, DwollaClient, StripeClient},
    codec::SharableIdCodec,
    state::AppState,
    store::PgStore,
};

/// CORS policy for the configured browser origins; none configured means same-origin only.
fn cors_layer(origins: &[String]) -> anyhow::Result<CorsLayer> {
    let origins = origins
        .iter()
        .map(|origin| HeaderValue::from_str(origin))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Reads RUST_LOG, defaults to "info"
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = config::Config::from_env()?;
    tracing::info!("Configuration loaded");

    let pool = db::create_pool(&config.database_url).await?;
    tracing::info!("Database pool created");

    db::run_migrations(&pool).await?;
    tracing::info!("Database migrations complete");

    let http = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.external_timeout_secs))
        .build()?;

    let auth = AppwriteClient::new(
        http.clone(),
        &config.auth_endpoint,
        config.auth_project_id.clone(),
        config.auth_api_key.clone(),
    )?;
    let billing = StripeClient::new(
        http.clone(),
        &config.billing_api_url,
        config.billing_secret_key.clone(),
        config.onboarding_refresh_url.clone(),
        config.onboarding_return_url.clone(),
    )?;
    let transfers = DwollaClient::new(
        http,
        &config.transfer_api_url,
        config.transfer_key.clone(),
        config.transfer_secret.clone(),
    )?;

    let state = AppState {
        store: Arc::new(PgStore::new(pool)),
        auth: Arc::new(auth),
        billing: Arc::new(billing),
        transfers: Arc::new(transfers),
        codec: SharableIdCodec::new(&config.sharable_id_secret),
    };

    let app = routes::build_router(state).layer(cors_layer(&config.allowed_origins())?);

    let addr = format!("0.0.0.0:{}", config.server_port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
