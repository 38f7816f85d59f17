use anyhow::Result;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::Arc;

use crate::embedding::Embedder;
use crate::search::normalize::{l2_normalize, magnitude};

/// Hybrid filter applied alongside vector similarity in one search call.
#[derive(Debug, Clone, Default)]
pub struct VectorFilter {
    /// Keep only entries carrying at least one of these categories.
    pub categories: Option<Vec<String>>,
    pub min_similarity: Option<f32>,
    /// Optional keyword filter against the stored document text.
    pub text_query: Option<String>,
}

#[derive(Debug, Clone)]
pub struct VectorMatch {
    pub id: String,
    pub similarity: f32,
    pub metadata: serde_json::Value,
}

/// Contract for a persisted vector database. The concrete SQL/HTTP driver
/// lives behind this seam.
#[async_trait]
pub trait VectorBackend: Send + Sync {
    async fn connect(&self) -> Result<()>;
    async fn init_database(&self) -> Result<()>;
    async fn add_vector(&self, id: &str, vector: &[f32], metadata: serde_json::Value)
        -> Result<()>;
    async fn search_vectors(
        &self,
        vector: &[f32],
        limit: usize,
        filter: &VectorFilter,
    ) -> Result<Vec<VectorMatch>>;
    async fn delete_all(&self) -> Result<()>;
}

/// Persisted-store variant of the local engine contract.
///
/// When no backend is configured, or `init` has not run yet, every
/// operation warns and no-ops (returning empty for searches) instead of
/// erroring: a missing remote store must never take down a search request.
pub struct RemoteVectorStore {
    backend: Option<Arc<dyn VectorBackend>>,
    embedder: Arc<dyn Embedder>,
    initialized: Mutex<bool>,
}

impl RemoteVectorStore {
    pub fn new(backend: Option<Arc<dyn VectorBackend>>, embedder: Arc<dyn Embedder>) -> Self {
        Self {
            backend,
            embedder,
            initialized: Mutex::new(false),
        }
    }

    /// Connect and initialize the backing database. Safe to skip; operations
    /// before (or without) init degrade to no-ops.
    pub async fn init(&self) -> Result<()> {
        let Some(backend) = &self.backend else {
            tracing::warn!("Remote vector store has no backend configured, skipping init");
            return Ok(());
        };
        backend.connect().await?;
        backend.init_database().await?;
        *self.initialized.lock() = true;
        Ok(())
    }

    fn ready(&self) -> Option<&Arc<dyn VectorBackend>> {
        match &self.backend {
            None => {
                tracing::warn!("Remote vector store not configured, skipping operation");
                None
            }
            Some(_) if !*self.initialized.lock() => {
                tracing::warn!("Remote vector store not initialized, skipping operation");
                None
            }
            Some(backend) => Some(backend),
        }
    }

    pub async fn add(&self, id: &str, text: &str, metadata: serde_json::Value) -> Result<()> {
        let Some(backend) = self.ready() else {
            return Ok(());
        };

        let raw = self.embedder.embed(text).await?;
        let normalized = l2_normalize(&raw);
        tracing::debug!(
            id,
            magnitude_before = magnitude(&raw),
            magnitude_after = magnitude(&normalized),
            "Normalized vector for remote store"
        );

        backend.add_vector(id, &normalized, metadata).await
    }

    pub async fn search(
        &self,
        query: &str,
        limit: usize,
        filter: &VectorFilter,
    ) -> Result<Vec<VectorMatch>> {
        let Some(backend) = self.ready() else {
            return Ok(Vec::new());
        };

        let vector = l2_normalize(&self.embedder.embed(query).await?);
        backend.search_vectors(&vector, limit, filter).await
    }

    pub async fn clear(&self) -> Result<()> {
        let Some(backend) = self.ready() else {
            return Ok(());
        };
        backend.delete_all().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embedding::HashEmbedder;
    use crate::search::normalize::cosine_similarity;
    use serde_json::json;

    /// In-memory backend standing in for the persisted database.
    #[derive(Default)]
    struct MemoryBackend {
        rows: Mutex<Vec<(String, Vec<f32>, serde_json::Value, String)>>,
    }

    #[async_trait]
    impl VectorBackend for MemoryBackend {
        async fn connect(&self) -> Result<()> {
            Ok(())
        }

        async fn init_database(&self) -> Result<()> {
            Ok(())
        }

        async fn add_vector(
            &self,
            id: &str,
            vector: &[f32],
            metadata: serde_json::Value,
        ) -> Result<()> {
            let document = metadata
                .get("description")
                .and_then(|v| v.as_str())
                .unwrap_or_default()
                .to_string();
            self.rows
                .lock()
                .push((id.to_string(), vector.to_vec(), metadata, document));
            Ok(())
        }

        async fn search_vectors(
            &self,
            vector: &[f32],
            limit: usize,
            filter: &VectorFilter,
        ) -> Result<Vec<VectorMatch>> {
            let rows = self.rows.lock();
            let mut matches: Vec<VectorMatch> = rows
                .iter()
                .filter(|(_, _, metadata, document)| {
                    let category_ok = filter.categories.as_ref().is_none_or(|wanted| {
                        metadata
                            .get("categories")
                            .and_then(|c| c.as_array())
                            .is_some_and(|cats| {
                                cats.iter()
                                    .filter_map(|c| c.as_str())
                                    .any(|c| wanted.iter().any(|w| w == c))
                            })
                    });
                    let text_ok = filter
                        .text_query
                        .as_ref()
                        .is_none_or(|q| document.to_lowercase().contains(&q.to_lowercase()));
                    category_ok && text_ok
                })
                .map(|(id, v, metadata, _)| VectorMatch {
                    id: id.clone(),
                    similarity: cosine_similarity(vector, v),
                    metadata: metadata.clone(),
                })
                .filter(|m| filter.min_similarity.is_none_or(|t| m.similarity >= t))
                .collect();
            matches.sort_by(|a, b| {
                b.similarity
                    .partial_cmp(&a.similarity)
                    .unwrap_or(std::cmp::Ordering::Equal)
            });
            matches.truncate(limit);
            Ok(matches)
        }

        async fn delete_all(&self) -> Result<()> {
            self.rows.lock().clear();
            Ok(())
        }
    }

    fn embedder() -> Arc<dyn Embedder> {
        Arc::new(HashEmbedder::new(128))
    }

    #[tokio::test]
    async fn test_unconfigured_store_noops() {
        let store = RemoteVectorStore::new(None, embedder());
        store.init().await.unwrap();
        store.add("x", "text", json!({})).await.unwrap();
        let matches = store
            .search("anything", 5, &VectorFilter::default())
            .await
            .unwrap();
        assert!(matches.is_empty());
    }

    #[tokio::test]
    async fn test_uninitialized_store_noops() {
        let store = RemoteVectorStore::new(Some(Arc::new(MemoryBackend::default())), embedder());
        // No init() call.
        store.add("x", "text", json!({})).await.unwrap();
        let matches = store
            .search("text", 5, &VectorFilter::default())
            .await
            .unwrap();
        assert!(matches.is_empty());
    }

    #[tokio::test]
    async fn test_add_and_search_round_trip() {
        let store = RemoteVectorStore::new(Some(Arc::new(MemoryBackend::default())), embedder());
        store.init().await.unwrap();

        store
            .add(
                "db",
                "postgres database client",
                json!({"description": "postgres database client", "categories": ["database"]}),
            )
            .await
            .unwrap();
        store
            .add(
                "weather",
                "weather forecast alerts",
                json!({"description": "weather forecast alerts", "categories": ["weather"]}),
            )
            .await
            .unwrap();

        let matches = store
            .search("postgres database", 5, &VectorFilter::default())
            .await
            .unwrap();
        assert_eq!(matches[0].id, "db");
    }

    #[tokio::test]
    async fn test_category_filter() {
        let store = RemoteVectorStore::new(Some(Arc::new(MemoryBackend::default())), embedder());
        store.init().await.unwrap();

        store
            .add(
                "db",
                "database tool",
                json!({"description": "database tool", "categories": ["database"]}),
            )
            .await
            .unwrap();
        store
            .add(
                "fs",
                "database backup to filesystem",
                json!({"description": "database backup to filesystem", "categories": ["files"]}),
            )
            .await
            .unwrap();

        let filter = VectorFilter {
            categories: Some(vec!["files".to_string()]),
            ..Default::default()
        };
        let matches = store.search("database", 5, &filter).await.unwrap();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].id, "fs");
    }

    #[tokio::test]
    async fn test_text_and_similarity_filters() {
        let store = RemoteVectorStore::new(Some(Arc::new(MemoryBackend::default())), embedder());
        store.init().await.unwrap();

        store
            .add(
                "a",
                "kubernetes cluster manager",
                json!({"description": "kubernetes cluster manager"}),
            )
            .await
            .unwrap();
        store
            .add(
                "b",
                "docker container runner",
                json!({"description": "docker container runner"}),
            )
            .await
            .unwrap();

        let filter = VectorFilter {
            text_query: Some("kubernetes".to_string()),
            min_similarity: Some(0.1),
            ..Default::default()
        };
        let matches = store
            .search("kubernetes cluster", 5, &filter)
            .await
            .unwrap();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].id, "a");
        assert!(matches[0].similarity >= 0.1);
    }

    #[tokio::test]
    async fn test_clear_deletes_all() {
        let backend = Arc::new(MemoryBackend::default());
        let store = RemoteVectorStore::new(Some(backend.clone()), embedder());
        store.init().await.unwrap();
        store
            .add("a", "text", json!({"description": "text"}))
            .await
            .unwrap();
        store.clear().await.unwrap();
        assert!(backend.rows.lock().is_empty());
    }
}
