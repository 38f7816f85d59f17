use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;

use super::SearchProvider;
use crate::config::RegistryConfig;
use crate::models::{CandidateResult, SearchQuery};

pub const PROVIDER_NAME: &str = "registry";

/// One server entry as reported by the service registry.
#[derive(Debug, Clone, Deserialize)]
pub struct RegistryEntry {
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Opaque agent configuration; the source URL is extracted from its
    /// `url` or `repository` field when present.
    #[serde(rename = "agentConfig", default)]
    pub agent_config: serde_json::Value,
}

/// Lookup contract for the service registry.
#[async_trait]
pub trait RegistryClient: Send + Sync {
    async fn find_servers(&self, keyword: &str) -> Result<Vec<RegistryEntry>>;
}

/// Thin HTTP client for the registry admin API.
pub struct HttpRegistryClient {
    config: RegistryConfig,
    client: reqwest::Client,
}

impl HttpRegistryClient {
    pub fn new(config: RegistryConfig, client: reqwest::Client) -> Self {
        Self { config, client }
    }
}

#[async_trait]
impl RegistryClient for HttpRegistryClient {
    async fn find_servers(&self, keyword: &str) -> Result<Vec<RegistryEntry>> {
        let url = format!(
            "{}/servers?keyword={}",
            self.config.server_addr,
            urlencoding::encode(keyword)
        );

        let resp = self
            .client
            .get(&url)
            .basic_auth(&self.config.username, Some(&self.config.password))
            .send()
            .await
            .context("Failed to call registry API")?;

        if !resp.status().is_success() {
            anyhow::bail!("Registry API returned {}", resp.status());
        }

        resp.json().await.context("Failed to parse registry response")
    }
}

/// Service-registry-backed provider. Queries the registry with the task
/// description and each keyword, merging the entries by name.
pub struct RegistryProvider {
    client: Arc<dyn RegistryClient>,
}

impl RegistryProvider {
    pub fn new(client: Arc<dyn RegistryClient>) -> Self {
        Self { client }
    }

    fn to_candidate(entry: RegistryEntry) -> CandidateResult {
        let source_url = entry
            .agent_config
            .get("url")
            .or_else(|| entry.agent_config.get("repository"))
            .and_then(|v| v.as_str())
            .map(String::from)
            .unwrap_or_else(|| format!("registry://{}", entry.name));

        CandidateResult {
            id: entry.name.clone(),
            title: entry.name,
            description: entry.description,
            source_url,
            // Registry lookups are keyword matches filtered server-side;
            // treat each returned entry as a full-strength signal and let
            // provider priority weigh it against the other sources.
            similarity: 1.0,
            score: None,
            provider: PROVIDER_NAME.to_string(),
            categories: None,
            tags: None,
            installations: None,
        }
    }
}

#[async_trait]
impl SearchProvider for RegistryProvider {
    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    async fn search(&self, query: &SearchQuery) -> Result<Vec<CandidateResult>> {
        let mut terms = vec![query.task_description.clone()];
        terms.extend(query.keywords.iter().cloned());
        terms.extend(query.capabilities.iter().cloned());
        terms.dedup();

        let mut results: Vec<CandidateResult> = Vec::new();
        for term in &terms {
            let entries = self.client.find_servers(term).await?;
            for entry in entries {
                if results.iter().all(|r| r.id != entry.name) {
                    results.push(Self::to_candidate(entry));
                }
            }
        }
        Ok(results)
    }
}
