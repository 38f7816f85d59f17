//! Bulk catalog loading for the offline vector provider.
//!
//! Catalog sources are JSON maps of `id -> entry`. Each source is fetched
//! and parsed independently: a malformed or unreachable source logs a
//! warning and contributes zero entries without aborting the others.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

use crate::cache::TtlCache;
use crate::search::vector::VectorStore;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Repository {
    #[serde(default)]
    pub url: String,
}

/// One catalog entry describing an MCP server.
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogEntry {
    #[serde(skip)]
    pub id: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub repository: Repository,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub installations: HashMap<String, serde_json::Value>,
}

impl CatalogEntry {
    /// Text embedded for similarity search: name plus description plus tags.
    pub fn embed_text(&self) -> String {
        let mut text = format!("{} {}", self.display_name, self.description);
        if !self.tags.is_empty() {
            text.push(' ');
            text.push_str(&self.tags.join(" "));
        }
        text
    }

    fn metadata(&self) -> serde_json::Value {
        serde_json::json!({
            "id": self.id,
            "display_name": self.display_name,
            "description": self.description,
            "source_url": self.repository.url,
            "categories": self.categories,
            "tags": self.tags,
            "installations": self.installations,
        })
    }
}

/// Parse one catalog source body (`id -> entry` JSON map).
pub fn parse_catalog(body: &str) -> Result<Vec<CatalogEntry>> {
    let map: HashMap<String, CatalogEntry> =
        serde_json::from_str(body).context("Catalog is not an id -> entry map")?;
    let mut entries: Vec<CatalogEntry> = map
        .into_iter()
        .map(|(id, mut entry)| {
            entry.id = id;
            entry
        })
        .collect();
    // Deterministic load order regardless of map iteration.
    entries.sort_by(|a, b| a.id.cmp(&b.id));
    Ok(entries)
}

/// Fetches catalog sources and caches the merged entry list.
pub struct CatalogLoader {
    urls: Vec<String>,
    client: reqwest::Client,
    cache: TtlCache<Vec<CatalogEntry>>,
}

impl CatalogLoader {
    pub fn new(urls: Vec<String>, client: reqwest::Client, ttl: Duration) -> Self {
        Self {
            urls,
            client,
            cache: TtlCache::new(ttl),
        }
    }

    async fn fetch_source(&self, url: &str) -> Result<Vec<CatalogEntry>> {
        let resp = self
            .client
            .get(url)
            .send()
            .await
            .with_context(|| format!("Failed to fetch catalog {url}"))?;

        if !resp.status().is_success() {
            anyhow::bail!("Catalog {url} returned {}", resp.status());
        }

        let body = resp
            .text()
            .await
            .with_context(|| format!("Failed to read catalog {url}"))?;
        parse_catalog(&body)
    }

    /// All entries across sources, served from cache while fresh. A failing
    /// source is logged and skipped.
    pub async fn load(&self) -> Vec<CatalogEntry> {
        if let Some(cached) = self.cache.get() {
            return cached;
        }

        let mut entries = Vec::new();
        for url in &self.urls {
            match self.fetch_source(url).await {
                Ok(mut source_entries) => {
                    tracing::info!(url, count = source_entries.len(), "Loaded catalog source");
                    entries.append(&mut source_entries);
                }
                Err(e) => {
                    tracing::warn!(url, error = %e, "Skipping catalog source");
                }
            }
        }

        self.cache.set(entries.clone());
        entries
    }
}

/// Embed and index catalog entries into the offline store.
pub async fn populate_store(store: &VectorStore, entries: &[CatalogEntry]) -> Result<()> {
    for entry in entries {
        store.add(&entry.embed_text(), entry.metadata()).await?;
    }
    tracing::info!(count = entries.len(), "Offline vector store populated");
    Ok(())
}
