//! Pluggable sources of candidate results.
//!
//! Every provider exposes the same capability: `search(query)` returning a
//! list of candidates. The orchestrator treats them uniformly and isolates
//! their failures from each other.

mod fulltext;
mod offline;
mod recommend;
mod registry;

pub use fulltext::FulltextProvider;
pub use offline::OfflineProvider;
pub use recommend::RecommendProvider;
pub use registry::{HttpRegistryClient, RegistryClient, RegistryEntry, RegistryProvider};

use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;

use crate::config::Config;
use crate::embedding::Embedder;
use crate::models::{CandidateResult, SearchQuery};
use crate::search::resilient::ResilientClient;
use crate::search::vector::VectorStore;

/// Uniform provider contract consumed by the orchestrator.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    fn name(&self) -> &str;
    async fn search(&self, query: &SearchQuery) -> Result<Vec<CandidateResult>>;
}

pub struct ProviderSet {
    pub providers: Vec<Arc<dyn SearchProvider>>,
    /// Offline store, exposed so startup can populate it from catalogs.
    pub store: Arc<VectorStore>,
    /// Resilient full-text client, exposed for health monitoring.
    pub resilient: Option<Arc<ResilientClient>>,
}

/// Build every provider the config makes constructible. Providers with
/// incomplete configuration are skipped with a warning rather than
/// instantiated half-wired. Errors when nothing is constructible; a
/// discovery service with zero providers is a startup failure.
pub fn build_providers(
    config: &Config,
    http_client: &reqwest::Client,
    embedder: Arc<dyn Embedder>,
) -> Result<ProviderSet> {
    let mut providers: Vec<Arc<dyn SearchProvider>> = Vec::new();
    let mut resilient = None;

    match &config.recommend_base_url {
        Some(base_url) => {
            providers.push(Arc::new(RecommendProvider::new(
                base_url.clone(),
                http_client.clone(),
            )));
        }
        None => tracing::warn!("Recommendation API URL not set, provider skipped"),
    }

    match &config.backend {
        Some(active) => {
            let client = Arc::new(ResilientClient::from_config(
                active,
                config.backend_fallback.as_ref(),
                http_client,
            ));
            providers.push(Arc::new(FulltextProvider::new(client.clone())));
            resilient = Some(client);
        }
        None => tracing::warn!("Full-text backend not configured, provider skipped"),
    }

    match &config.registry {
        Some(registry) => {
            let client = HttpRegistryClient::new(registry.clone(), http_client.clone());
            providers.push(Arc::new(RegistryProvider::new(Arc::new(client))));
        }
        None => tracing::warn!("Registry credentials absent, provider skipped"),
    }

    // The offline vector provider is the no-network floor under everything
    // else; it only earns a slot when there are catalog sources to index.
    let store = Arc::new(VectorStore::new(embedder));
    if config.catalog_urls.is_empty() {
        tracing::warn!("No catalog sources configured, offline provider skipped");
    } else {
        providers.push(Arc::new(OfflineProvider::new(store.clone())));
    }

    if providers.is_empty() {
        anyhow::bail!("No search providers constructible from configuration");
    }

    Ok(ProviderSet {
        providers,
        store,
        resilient,
    })
}
