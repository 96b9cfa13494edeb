//! Binary entrypoint for the obsgate API server.
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Default listen address can be overridden with OBSGATE_ADDR
    let addr = std::env::var("OBSGATE_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string());
    obsgate_api::run(&addr).await;
}
