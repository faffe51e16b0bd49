use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, limit::RequestBodyLimitLayer, trace::TraceLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use contact_enrich_api::config::Config;
use contact_enrich_api::handlers::{self, AppState};

/// Main entry point for the application.
///
/// Initializes logging, loads configuration, and starts the Axum server
/// exposing the enrichment endpoint and a health check.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "contact_enrich_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env()?;

    // Build application state
    let app_state = Arc::new(AppState {
        config: config.clone(),
    });

    let app = Router::new()
        .route("/health", get(handlers::health))
        .route("/api/v1/enrich", post(handlers::enrich_contacts))
        .with_state(app_state)
        .layer(
            // Request size limit: 5MB max upload (prevents memory exhaustion)
            ServiceBuilder::new().layer(RequestBodyLimitLayer::new(5 * 1024 * 1024)),
        )
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
