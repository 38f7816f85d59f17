use anyhow::Result;
use async_trait::async_trait;

use super::SearchProvider;
use crate::models::{CandidateResult, SearchQuery};
use crate::search::fulltext::EngineHit;
use crate::search::resilient::ResilientClient;

pub const PROVIDER_NAME: &str = "fulltext";

/// How many hits to pull from the engine per query; the reranker trims the
/// merged set afterwards.
const FETCH_LIMIT: usize = 20;

/// Adapter over the resilient full-text backend pair.
pub struct FulltextProvider {
    client: std::sync::Arc<ResilientClient>,
}

impl FulltextProvider {
    pub fn new(client: std::sync::Arc<ResilientClient>) -> Self {
        Self { client }
    }

    fn to_candidate(hit: EngineHit) -> CandidateResult {
        CandidateResult {
            id: hit.id,
            title: hit.title,
            description: hit.description,
            // The ranking score becomes the similarity signal; no explicit
            // score is set so provider priority applies.
            similarity: hit.ranking_score.unwrap_or(0.0),
            score: None,
            source_url: hit.github_url,
            provider: PROVIDER_NAME.to_string(),
            categories: None,
            tags: None,
            installations: hit.installations,
        }
    }
}

#[async_trait]
impl SearchProvider for FulltextProvider {
    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    async fn search(&self, query: &SearchQuery) -> Result<Vec<CandidateResult>> {
        let outcome = self
            .client
            .search(&query.search_text(), FETCH_LIMIT)
            .await?;
        Ok(outcome.hits.into_iter().map(Self::to_candidate).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ranking_score_becomes_similarity() {
        let hit = EngineHit {
            id: "srv".to_string(),
            title: "Server".to_string(),
            description: "desc".to_string(),
            github_url: "https://github.com/a/b".to_string(),
            ranking_score: Some(0.66),
            installations: None,
        };
        let c = FulltextProvider::to_candidate(hit);
        assert_eq!(c.similarity, 0.66);
        assert!(c.score.is_none());
    }

    #[test]
    fn test_missing_ranking_score_is_zero() {
        let hit = EngineHit {
            id: "srv".to_string(),
            title: String::new(),
            description: String::new(),
            github_url: String::new(),
            ranking_score: None,
            installations: None,
        };
        let c = FulltextProvider::to_candidate(hit);
        assert_eq!(c.similarity, 0.0);
        // No source URL: dedup falls back to the id.
        assert_eq!(c.dedup_key(), "srv");
    }
}
