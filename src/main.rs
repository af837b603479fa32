// Main entry point - Dependency injection and server setup
use std::{net::SocketAddr, sync::Arc};

use axum::{routing::get, Router};
use tower_http::{compression::CompressionLayer, trace::TraceLayer};
use tracing_subscriber::EnvFilter;

use telemetry_chart_data::application::chart_service::ChartDataService;
use telemetry_chart_data::infrastructure::config::load_service_config;
use telemetry_chart_data::infrastructure::latis_repository::LatisRepository;
use telemetry_chart_data::presentation::app_state::AppState;
use telemetry_chart_data::presentation::handlers::{get_events, get_series, health_check};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Load configuration
    let config = load_service_config()?;

    // Create repository (infrastructure layer)
    let repository = Arc::new(LatisRepository::new(
        &config.latis.base_url,
        config.latis.timeout_secs,
    )?);

    // Create services (application layer)
    let chart_service = ChartDataService::new(repository);

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    let state = Arc::new(AppState {
        chart_service,
        config,
    });

    // Build router (presentation layer)
    let router = Router::new()
        .route("/healthz", get(health_check))
        .route("/series", get(get_series))
        .route("/events", get(get_events))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start server
    tracing::info!("Starting telemetry-chart-data service on {}", addr);
    axum::serve(tokio::net::TcpListener::bind(addr).await?, router).await?;

    Ok(())
}
