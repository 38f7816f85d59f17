use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;

use super::SearchProvider;
use crate::models::{CandidateResult, SearchQuery};

pub const PROVIDER_NAME: &str = "recommend";

/// Adapter over the remote recommendation API:
/// `GET {base}/recommend?description=<query>`.
pub struct RecommendProvider {
    base_url: String,
    client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct RecommendEntry {
    #[serde(default)]
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    github_url: String,
    #[serde(default)]
    score: f32,
}

impl RecommendProvider {
    pub fn new(base_url: String, client: reqwest::Client) -> Self {
        Self { base_url, client }
    }

    fn to_candidate(&self, entry: RecommendEntry) -> CandidateResult {
        CandidateResult {
            id: entry.github_url.clone(),
            title: entry.title,
            description: entry.description,
            source_url: entry.github_url,
            similarity: entry.score,
            score: None,
            provider: PROVIDER_NAME.to_string(),
            categories: None,
            tags: None,
            installations: None,
        }
    }
}

#[async_trait]
impl SearchProvider for RecommendProvider {
    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    async fn search(&self, query: &SearchQuery) -> Result<Vec<CandidateResult>> {
        let url = format!(
            "{}/recommend?description={}",
            self.base_url,
            urlencoding::encode(&query.search_text())
        );

        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .context("Failed to call recommendation API")?;

        if !resp.status().is_success() {
            anyhow::bail!("Recommendation API returned {}", resp.status());
        }

        let entries: Vec<RecommendEntry> = resp
            .json()
            .await
            .context("Failed to parse recommendation response")?;

        Ok(entries
            .into_iter()
            .map(|e| self.to_candidate(e))
            .collect())
    }
}
