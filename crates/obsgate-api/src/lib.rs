//! Obsgate API: REST surface for Observation batch ingestion
pub mod handlers;
pub mod metrics;
pub mod middleware;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

pub async fn create_app() -> Router {
    Router::new()
        .route(
            "/api/data-pipeline/ingest/Observation",
            post(handlers::ingest_observations),
        )
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        .route("/metrics", get(handlers::metrics_endpoint))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::cors())
}

pub async fn run(addr: &str) {
    let app = create_app().await;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind");

    tracing::info!("obsgate API listening on {}", addr);
    axum::serve(listener, app)
        .await
        .expect("Server error");
}
