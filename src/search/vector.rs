use anyhow::{Context, Result};
use parking_lot::RwLock;
use serde::Serialize;
use std::sync::Arc;

use crate::embedding::Embedder;
use crate::search::normalize::{cosine_similarity, l2_normalize, similarity_to_distance};

/// A stored vector record. Vectors are always unit-normalized; re-adding the
/// same id replaces the record.
#[derive(Debug, Clone)]
struct VectorRecord {
    id: String,
    vector: Vec<f32>,
    document: String,
    metadata: serde_json::Value,
}

/// Query response in the generic vector-database shape: parallel arrays of
/// ids, documents, metadatas, and distances. Kept structurally identical so
/// existing vector-DB client code can consume it.
#[derive(Debug, Clone, Default, Serialize)]
pub struct QueryResponse {
    pub ids: Vec<String>,
    pub documents: Vec<String>,
    pub metadatas: Vec<serde_json::Value>,
    pub distances: Vec<f32>,
}

/// In-memory vector collection with cosine similarity search.
///
/// The embedder is injected at construction; the store never selects one
/// itself. Mutation is serialized behind an RwLock so the store is safe to
/// share across request handlers.
pub struct VectorStore {
    records: RwLock<Vec<VectorRecord>>,
    embedder: Arc<dyn Embedder>,
}

impl VectorStore {
    pub fn new(embedder: Arc<dyn Embedder>) -> Self {
        Self {
            records: RwLock::new(Vec::new()),
            embedder,
        }
    }

    /// Embed `text`, unit-normalize the vector, and store it under
    /// `metadata.id`. Re-adding an existing id overwrites its record.
    pub async fn add(&self, text: &str, metadata: serde_json::Value) -> Result<()> {
        let id = metadata
            .get("id")
            .and_then(|v| v.as_str())
            .context("metadata.id is required")?
            .to_string();

        let vector = l2_normalize(&self.embedder.embed(text).await?);

        let mut records = self.records.write();
        records.retain(|r| r.id != id);
        records.push(VectorRecord {
            id,
            vector,
            document: text.to_string(),
            metadata,
        });
        Ok(())
    }

    /// Embed and normalize `query`, score every stored record by cosine
    /// similarity, and return the top `k` by similarity descending with
    /// `distance = 1 - similarity`.
    pub async fn search(&self, query: &str, k: usize) -> Result<QueryResponse> {
        let query_vector = l2_normalize(&self.embedder.embed(query).await?);

        let records = self.records.read();
        let mut scored: Vec<(f32, &VectorRecord)> = records
            .iter()
            .map(|r| (cosine_similarity(&query_vector, &r.vector), r))
            .collect();

        scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(k);

        let mut resp = QueryResponse::default();
        for (similarity, record) in scored {
            resp.ids.push(record.id.clone());
            resp.documents.push(record.document.clone());
            resp.metadatas.push(record.metadata.clone());
            resp.distances.push(similarity_to_distance(similarity));
        }
        Ok(resp)
    }

    /// Fetch records by id, in the order requested; missing ids are skipped.
    pub fn get(&self, ids: &[String]) -> QueryResponse {
        let records = self.records.read();
        let mut resp = QueryResponse::default();
        for id in ids {
            if let Some(record) = records.iter().find(|r| &r.id == id) {
                resp.ids.push(record.id.clone());
                resp.documents.push(record.document.clone());
                resp.metadatas.push(record.metadata.clone());
            }
        }
        resp
    }

    pub fn clear(&self) {
        self.records.write().clear();
    }

    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }
}
