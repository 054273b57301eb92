//! HTTP server implementation using Axum.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    Router,
    routing::{delete, get, post},
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use askvault_core::config::GatewayConfig;
use askvault_retrieval::RetrievalService;

/// Shared state for the gateway server.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<RetrievalService>,
}

/// Build the Axum router with all routes.
pub fn build_router(state: AppState, config: &GatewayConfig) -> Router {
    Router::new()
        .route(
            "/api/v1/documents",
            post(super::routes::upload_document).get(super::routes::list_documents),
        )
        .route("/api/v1/documents/{id}", delete(super::routes::delete_document))
        .route("/api/v1/query", post(super::routes::query_documents))
        .route("/health", get(super::routes::health_check))
        .layer(cors_layer(&config.allowed_origins))
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(state))
}

/// CORS layer from the configured origins.
///
/// `ASKVAULT_CORS_ORIGINS` (comma-separated) overrides the config; when no
/// origin parses, development fallback is allow-all.
fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([
            axum::http::Method::GET,
            axum::http::Method::POST,
            axum::http::Method::DELETE,
            axum::http::Method::OPTIONS,
        ])
        .allow_headers(Any)
        .max_age(Duration::from_secs(3600));

    let configured: Vec<String> = match std::env::var("ASKVAULT_CORS_ORIGINS") {
        Ok(origins_str) => origins_str.split(',').map(|s| s.trim().to_string()).collect(),
        Err(_) => allowed_origins.to_vec(),
    };
    let origins: Vec<axum::http::HeaderValue> = configured
        .iter()
        .filter_map(|s| s.parse::<axum::http::HeaderValue>().ok())
        .collect();

    if origins.is_empty() {
        cors.allow_origin(Any)
    } else {
        cors.allow_origin(origins)
    }
}

/// Start the HTTP server.
pub async fn start(config: &GatewayConfig, service: Arc<RetrievalService>) -> anyhow::Result<()> {
    let app = build_router(AppState { service }, config);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("🌐 Gateway listening on http://{}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}
