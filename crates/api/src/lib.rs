//! # Health Army API
//!
//! HTTP surface of the volunteer registry.
//!
//! ## Architecture
//!
//! - **Routes**: endpoint paths, grouped by area
//! - **Handlers**: extract the principal and payload, then call the
//!   [`VolunteerService`]
//! - **Middleware**: principal resolution and error mapping
//! - **Config**: environment configuration
//!
//! Storage, token verification and notifications are injected through
//! [`ApiState`], so the router can run against PostgreSQL or in-memory
//! collaborators alike.

/// Configuration module for API settings
pub mod config;
/// Request handlers
pub mod handlers;
/// Principal resolution and error handling
pub mod middleware;
/// Route definitions and API endpoint structure
pub mod routes;

use std::sync::Arc;
use std::time::Duration;

use axum::{
    http::{header, HeaderValue, Method},
    Router,
};
use eyre::{Result, WrapErr};
use healtharmy_core::{repository::UserRepository, service::VolunteerService};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::FmtSubscriber;
use uuid::Uuid;

use middleware::auth::TokenVerifier;

/// Shared application state that is accessible to all request handlers
pub struct ApiState {
    pub volunteers: VolunteerService,
    pub users: Arc<dyn UserRepository>,
    pub verifier: Arc<dyn TokenVerifier>,
    /// External user id that is created as an admin
    pub owner_id: Option<Uuid>,
}

/// Builds the router with every endpoint, without transport layers.
pub fn app(state: Arc<ApiState>) -> Router {
    Router::new()
        // Health check endpoints
        .merge(routes::health::routes())
        // Session endpoints
        .merge(routes::auth::routes())
        // Volunteer registry endpoints
        .merge(routes::volunteer::routes())
        .with_state(state)
}

fn cors_layer(origins: &[String]) -> Result<CorsLayer> {
    let origins = origins
        .iter()
        .map(|origin| {
            origin
                .parse::<HeaderValue>()
                .wrap_err_with(|| format!("Invalid CORS origin {origin:?}"))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::ACCEPT])
        .allow_origin(origins)
        .allow_credentials(true))
}

/// Installs the global tracing subscriber at the configured level.
pub fn init_tracing(config: &config::ApiConfig) -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(config.log_level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

/// Starts the API server with the provided configuration and collaborators
///
/// Wraps the router in request tracing, CORS (when origins are configured)
/// and a request timeout, then serves until the listener fails.
pub async fn start_server(config: config::ApiConfig, state: Arc<ApiState>) -> Result<()> {
    let app = app(state).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(TimeoutLayer::new(Duration::from_secs(config.request_timeout))),
    );

    let app = match &config.cors_origins {
        Some(origins) => app.layer(cors_layer(origins)?),
        None => app,
    };

    // Start the HTTP server
    let addr = config.server_addr();
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
