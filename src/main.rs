use axum::routing::{get, post};
use axum::Router;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

use mcp_discovery::api;
use mcp_discovery::config::Config;
use mcp_discovery::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env();
    tracing::info!(
        backend = config.backend.is_some(),
        recommend = config.recommend_base_url.is_some(),
        registry = config.registry.is_some(),
        catalogs = config.catalog_urls.len(),
        "Starting mcp-discovery"
    );

    // No providers constructible is fatal; the process exits non-zero.
    let state = AppState::new(config.clone())?;

    if let Err(e) = state.populate_offline_index().await {
        tracing::warn!(error = %e, "Offline index population failed");
    }

    state.spawn_health_monitor(Duration::from_secs(60));

    let app = Router::new()
        .route("/api/search", post(api::search::search))
        .route("/api/health", get(api::search::health))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("Server listening on {}", config.bind_addr);

    axum::serve(listener, app).await?;
    Ok(())
}
