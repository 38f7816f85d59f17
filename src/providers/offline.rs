use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;

use super::SearchProvider;
use crate::models::{CandidateResult, SearchQuery};
use crate::search::normalize::distance_to_similarity;
use crate::search::vector::VectorStore;

pub const PROVIDER_NAME: &str = "offline";

const FETCH_LIMIT: usize = 20;

/// Local vector-similarity provider. Works with no network access: the
/// store is populated from catalog sources at startup and queried with
/// whatever embedder it was built with.
pub struct OfflineProvider {
    store: Arc<VectorStore>,
}

impl OfflineProvider {
    pub fn new(store: Arc<VectorStore>) -> Self {
        Self { store }
    }

    fn to_candidate(
        id: String,
        document: String,
        metadata: &serde_json::Value,
        distance: f32,
    ) -> CandidateResult {
        let str_field = |key: &str| {
            metadata
                .get(key)
                .and_then(|v| v.as_str())
                .unwrap_or_default()
                .to_string()
        };
        let list_field = |key: &str| {
            metadata.get(key).and_then(|v| v.as_array()).map(|items| {
                items
                    .iter()
                    .filter_map(|i| i.as_str())
                    .map(String::from)
                    .collect::<Vec<_>>()
            })
        };
        let installations = metadata
            .get("installations")
            .and_then(|v| v.as_object())
            .map(|m| {
                m.iter()
                    .map(|(k, v)| (k.clone(), v.clone()))
                    .collect::<HashMap<_, _>>()
            });

        CandidateResult {
            title: str_field("display_name"),
            description: if document.is_empty() {
                str_field("description")
            } else {
                document
            },
            source_url: str_field("source_url"),
            similarity: distance_to_similarity(distance),
            score: None,
            provider: PROVIDER_NAME.to_string(),
            categories: list_field("categories"),
            tags: list_field("tags"),
            installations,
            id,
        }
    }
}

#[async_trait]
impl SearchProvider for OfflineProvider {
    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    async fn search(&self, query: &SearchQuery) -> Result<Vec<CandidateResult>> {
        let resp = self
            .store
            .search(&query.search_text(), FETCH_LIMIT)
            .await?;

        let mut results = Vec::with_capacity(resp.ids.len());
        for (((id, document), metadata), distance) in resp
            .ids
            .into_iter()
            .zip(resp.documents)
            .zip(&resp.metadatas)
            .zip(resp.distances)
        {
            results.push(Self::to_candidate(id, document, metadata, distance));
        }
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embedding::HashEmbedder;
    use serde_json::json;

    #[tokio::test]
    async fn test_search_maps_store_results() {
        let store = Arc::new(VectorStore::new(Arc::new(HashEmbedder::new(128))));
        store
            .add(
                "a filesystem server with read and write tools",
                json!({
                    "id": "fs-server",
                    "display_name": "FS Server",
                    "source_url": "https://github.com/a/fs",
                    "categories": ["files"],
                    "tags": ["filesystem", "io"],
                    "installations": {"npm": {"command": "npx"}}
                }),
            )
            .await
            .unwrap();

        let provider = OfflineProvider::new(store);
        let results = provider
            .search(&SearchQuery::new("filesystem read write"))
            .await
            .unwrap();

        assert_eq!(results.len(), 1);
        let c = &results[0];
        assert_eq!(c.id, "fs-server");
        assert_eq!(c.title, "FS Server");
        assert_eq!(c.dedup_key(), "https://github.com/a/fs");
        assert_eq!(c.categories.as_deref(), Some(&["files".to_string()][..]));
        assert!(c.installations.as_ref().unwrap().contains_key("npm"));
        assert!(c.similarity > 0.0);
    }

    #[tokio::test]
    async fn test_empty_store_yields_no_results() {
        let store = Arc::new(VectorStore::new(Arc::new(HashEmbedder::new(32))));
        let provider = OfflineProvider::new(store);
        let results = provider.search(&SearchQuery::new("anything")).await.unwrap();
        assert!(results.is_empty());
    }
}
