use std::sync::Arc;
use std::time::Duration;

use crate::catalog::{self, CatalogLoader};
use crate::config::Config;
use crate::embedding;
use crate::providers;
use crate::search::orchestrator::SearchOrchestrator;
use crate::search::rerank::Reranker;
use crate::search::resilient::ResilientClient;
use crate::search::vector::VectorStore;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub http_client: reqwest::Client,
    pub orchestrator: Arc<SearchOrchestrator>,
    pub catalog: Arc<CatalogLoader>,
    pub store: Arc<VectorStore>,
    pub resilient: Option<Arc<ResilientClient>>,
}

impl AppState {
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let http_client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .timeout(Duration::from_secs(30))
            .build()?;

        let embedder = embedding::build_embedder(&config.embedder, &http_client)?;
        tracing::info!(
            provider = %config.embedder.provider,
            dim = embedder.dim(),
            "Embedder ready"
        );
        let set = providers::build_providers(&config, &http_client, embedder)?;
        tracing::info!(count = set.providers.len(), "Search providers configured");

        let orchestrator = SearchOrchestrator::new(
            set.providers,
            Reranker::new(config.provider_priorities.clone()),
            Duration::from_secs(config.provider_timeout_secs),
        );

        let catalog = CatalogLoader::new(
            config.catalog_urls.clone(),
            http_client.clone(),
            Duration::from_millis(config.cache_ttl_ms),
        );

        Ok(Self {
            config,
            http_client,
            orchestrator: Arc::new(orchestrator),
            catalog: Arc::new(catalog),
            store: set.store,
            resilient: set.resilient,
        })
    }

    /// Load catalog sources and index them into the offline store.
    pub async fn populate_offline_index(&self) -> anyhow::Result<()> {
        let entries = self.catalog.load().await;
        if entries.is_empty() {
            tracing::warn!("No catalog entries loaded, offline provider starts empty");
            return Ok(());
        }
        catalog::populate_store(&self.store, &entries).await
    }

    /// Background health polling for the resilient backend. Observability
    /// only: it never reroutes request-path traffic.
    pub fn spawn_health_monitor(&self, interval: Duration) {
        let Some(resilient) = self.resilient.clone() else {
            return;
        };
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            loop {
                ticker.tick().await;
                match resilient.health_check().await {
                    Ok(true) => tracing::debug!("Search backend healthy"),
                    Ok(false) => tracing::warn!("Search backend reports unhealthy"),
                    Err(e) => tracing::warn!(error = %e, "Search backend health check failed"),
                }
            }
        });
    }
}
