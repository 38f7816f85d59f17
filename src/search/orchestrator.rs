use std::sync::Arc;
use std::time::Duration;

use crate::models::{CandidateResult, ProviderResults, SearchQuery};
use crate::providers::SearchProvider;
use crate::search::rerank::{Reranker, RerankOptions};

/// Fans a query out to every configured provider concurrently and hands the
/// combined result sets to the reranker.
///
/// Provider failures are isolated: a failing (or timed-out) provider is
/// logged and contributes an empty list, never aborting the other in-flight
/// calls. When every provider fails the result is simply an empty list; the
/// caller only cares about the absence of recommendations, not why.
pub struct SearchOrchestrator {
    providers: Vec<Arc<dyn SearchProvider>>,
    reranker: Reranker,
    provider_timeout: Duration,
}

impl SearchOrchestrator {
    pub fn new(
        providers: Vec<Arc<dyn SearchProvider>>,
        reranker: Reranker,
        provider_timeout: Duration,
    ) -> Self {
        Self {
            providers,
            reranker,
            provider_timeout,
        }
    }

    pub fn provider_count(&self) -> usize {
        self.providers.len()
    }

    /// Issue all provider calls, then await them all; completion order is
    /// irrelevant because ranking happens only after every call settles.
    async fn gather(&self, query: &SearchQuery) -> Vec<ProviderResults> {
        let calls = self.providers.iter().map(|provider| {
            let provider = provider.clone();
            async move {
                let name = provider.name().to_string();
                let results = match tokio::time::timeout(
                    self.provider_timeout,
                    provider.search(query),
                )
                .await
                {
                    Ok(Ok(results)) => {
                        tracing::debug!(provider = %name, count = results.len(), "Provider returned");
                        results
                    }
                    Ok(Err(e)) => {
                        tracing::warn!(provider = %name, error = %e, "Provider failed");
                        Vec::new()
                    }
                    Err(_) => {
                        tracing::warn!(provider = %name, "Provider timed out");
                        Vec::new()
                    }
                };
                ProviderResults {
                    provider: name,
                    results,
                }
            }
        });

        futures::future::join_all(calls).await
    }

    /// One ranked, deduplicated, best-effort result list. Never errors: total
    /// provider failure degrades to an empty list.
    pub async fn search(
        &self,
        query: &SearchQuery,
        options: &RerankOptions,
    ) -> Vec<CandidateResult> {
        let provider_results = self.gather(query).await;
        self.reranker.rerank(&provider_results, options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use async_trait::async_trait;
    use std::collections::HashMap;

    struct FixedProvider {
        name: String,
        results: Vec<CandidateResult>,
    }

    #[async_trait]
    impl SearchProvider for FixedProvider {
        fn name(&self) -> &str {
            &self.name
        }

        async fn search(&self, _query: &SearchQuery) -> Result<Vec<CandidateResult>> {
            Ok(self.results.clone())
        }
    }

    struct FailingProvider;

    #[async_trait]
    impl SearchProvider for FailingProvider {
        fn name(&self) -> &str {
            "failing"
        }

        async fn search(&self, _query: &SearchQuery) -> Result<Vec<CandidateResult>> {
            anyhow::bail!("backend unreachable")
        }
    }

    struct HangingProvider;

    #[async_trait]
    impl SearchProvider for HangingProvider {
        fn name(&self) -> &str {
            "hanging"
        }

        async fn search(&self, _query: &SearchQuery) -> Result<Vec<CandidateResult>> {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Ok(Vec::new())
        }
    }

    fn candidate(url: &str, similarity: f32) -> CandidateResult {
        CandidateResult {
            id: url.to_string(),
            title: url.to_string(),
            description: String::new(),
            source_url: url.to_string(),
            similarity,
            score: None,
            provider: String::new(),
            categories: None,
            tags: None,
            installations: None,
        }
    }

    fn orchestrator(providers: Vec<Arc<dyn SearchProvider>>) -> SearchOrchestrator {
        SearchOrchestrator::new(
            providers,
            Reranker::new(HashMap::new()),
            Duration::from_millis(200),
        )
    }

    #[tokio::test]
    async fn test_merges_results_across_providers() {
        let orch = orchestrator(vec![
            Arc::new(FixedProvider {
                name: "p1".to_string(),
                results: vec![candidate("a", 0.9)],
            }),
            Arc::new(FixedProvider {
                name: "p2".to_string(),
                results: vec![candidate("b", 0.5)],
            }),
        ]);

        let results = orch
            .search(&SearchQuery::new("q"), &RerankOptions::default())
            .await;
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].source_url, "a");
        // Each candidate is tagged with the provider that produced it.
        assert_eq!(results[0].provider, "p1");
        assert_eq!(results[1].provider, "p2");
    }

    #[tokio::test]
    async fn test_failing_provider_does_not_abort_others() {
        let orch = orchestrator(vec![
            Arc::new(FailingProvider),
            Arc::new(FixedProvider {
                name: "ok".to_string(),
                results: vec![candidate("survivor", 0.7)],
            }),
        ]);

        let results = orch
            .search(&SearchQuery::new("q"), &RerankOptions::default())
            .await;
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].source_url, "survivor");
    }

    #[tokio::test]
    async fn test_all_providers_failing_yields_empty_not_error() {
        let orch = orchestrator(vec![
            Arc::new(FailingProvider) as Arc<dyn SearchProvider>,
            Arc::new(FailingProvider),
        ]);

        let results = orch
            .search(&SearchQuery::new("q"), &RerankOptions::default())
            .await;
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn test_hung_provider_is_bounded_by_timeout() {
        let orch = orchestrator(vec![
            Arc::new(HangingProvider) as Arc<dyn SearchProvider>,
            Arc::new(FixedProvider {
                name: "fast".to_string(),
                results: vec![candidate("fast-result", 0.8)],
            }),
        ]);

        let start = std::time::Instant::now();
        let results = orch
            .search(&SearchQuery::new("q"), &RerankOptions::default())
            .await;
        assert!(start.elapsed() < Duration::from_secs(5));
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].source_url, "fast-result");
    }

    #[tokio::test]
    async fn test_rerank_options_applied() {
        let orch = orchestrator(vec![Arc::new(FixedProvider {
            name: "p".to_string(),
            results: vec![candidate("hi", 0.9), candidate("lo", 0.2)],
        })]);

        let opts = RerankOptions {
            min_score: Some(0.5),
            ..Default::default()
        };
        let results = orch.search(&SearchQuery::new("q"), &opts).await;
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].source_url, "hi");
    }
}
