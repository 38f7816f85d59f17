use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::config::BackendConfig;

/// One hit from the full-text engine. `ranking_score` becomes the
/// candidate's similarity when the hit carries no explicit score.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineHit {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub github_url: String,
    #[serde(rename = "_rankingScore")]
    pub ranking_score: Option<f32>,
    #[serde(default)]
    pub installations: Option<HashMap<String, serde_json::Value>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchOutcome {
    pub hits: Vec<EngineHit>,
}

/// Wire contract for one full-text backend deployment.
///
/// `health_check` has a default body: a client that exposes no health
/// capability is treated as healthy without contacting anything.
#[async_trait]
pub trait EngineClient: Send + Sync {
    async fn search(&self, text: &str, limit: usize) -> Result<SearchOutcome>;

    async fn health_check(&self) -> Result<bool> {
        Ok(true)
    }

    /// Short label for log lines ("local", "cloud").
    fn label(&self) -> &str;
}

/// Thin HTTP client for a Meilisearch-compatible deployment.
pub struct HttpEngineClient {
    config: BackendConfig,
    client: reqwest::Client,
    label: String,
}

#[derive(Serialize)]
struct EngineSearchRequest<'a> {
    q: &'a str,
    limit: usize,
    #[serde(rename = "showRankingScore")]
    show_ranking_score: bool,
}

#[derive(Deserialize)]
struct EngineHealth {
    status: String,
}

impl HttpEngineClient {
    pub fn new(config: BackendConfig, client: reqwest::Client) -> Self {
        let label = match config.kind {
            crate::config::BackendKind::Local => "local".to_string(),
            crate::config::BackendKind::Cloud => "cloud".to_string(),
        };
        Self {
            config,
            client,
            label,
        }
    }

    fn authorized(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.config.api_key {
            Some(key) => req.header("Authorization", format!("Bearer {key}")),
            None => req,
        }
    }
}

#[async_trait]
impl EngineClient for HttpEngineClient {
    async fn search(&self, text: &str, limit: usize) -> Result<SearchOutcome> {
        let url = format!(
            "{}/indexes/{}/search",
            self.config.host, self.config.index_name
        );
        let req = EngineSearchRequest {
            q: text,
            limit,
            show_ranking_score: true,
        };

        let resp = self
            .authorized(self.client.post(&url))
            .json(&req)
            .send()
            .await
            .with_context(|| format!("Failed to call {} search backend", self.label))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            anyhow::bail!("{} search backend returned {status}: {body}", self.label);
        }

        resp.json()
            .await
            .with_context(|| format!("Failed to parse {} search response", self.label))
    }

    async fn health_check(&self) -> Result<bool> {
        let url = format!("{}/health", self.config.host);
        let resp = self
            .authorized(self.client.get(&url))
            .send()
            .await
            .with_context(|| format!("Failed to call {} health endpoint", self.label))?;

        if !resp.status().is_success() {
            return Ok(false);
        }

        let health: EngineHealth = resp
            .json()
            .await
            .with_context(|| format!("Failed to parse {} health response", self.label))?;
        Ok(health.status == "available")
    }

    fn label(&self) -> &str {
        &self.label
    }
}
