use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A search request as submitted by a caller. Immutable once built.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchQuery {
    /// Natural-language description of the task the caller wants a server for.
    pub task_description: String,
    /// Extra keywords; order is irrelevant and the list may be empty.
    #[serde(default)]
    pub keywords: Vec<String>,
    /// Capability names the server should expose.
    #[serde(default)]
    pub capabilities: Vec<String>,
}

impl SearchQuery {
    pub fn new(task_description: impl Into<String>) -> Self {
        Self {
            task_description: task_description.into(),
            keywords: Vec::new(),
            capabilities: Vec::new(),
        }
    }

    /// The text fed to full-text and embedding backends: description plus keywords.
    pub fn search_text(&self) -> String {
        if self.keywords.is_empty() {
            self.task_description.clone()
        } else {
            format!("{} {}", self.task_description, self.keywords.join(" "))
        }
    }
}

/// One candidate server entry produced by exactly one provider call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateResult {
    pub id: String,
    pub title: String,
    pub description: String,
    pub source_url: String,
    /// Raw relevance signal from the provider, typically in [0, 1].
    pub similarity: f32,
    /// Provider-supplied ranking score. When present it is used as-is and
    /// the similarity x priority scaling is skipped.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f32>,
    /// Name of the provider that produced this entry.
    pub provider: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub categories: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    /// Installation recipes keyed by method name (npm, docker, ...).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub installations: Option<HashMap<String, serde_json::Value>>,
}

impl CandidateResult {
    /// Identity used to merge duplicates across providers: the canonical
    /// source URL when present, falling back to the provider-scoped id.
    pub fn dedup_key(&self) -> &str {
        if self.source_url.is_empty() {
            &self.id
        } else {
            &self.source_url
        }
    }
}

/// Results from a single provider, tagged with the provider's name.
#[derive(Debug, Clone)]
pub struct ProviderResults {
    pub provider: String,
    pub results: Vec<CandidateResult>,
}

/// Search request body for `POST /api/search`.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchRequest {
    pub task_description: String,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub capabilities: Vec<String>,
    pub limit: Option<usize>,
    pub min_score: Option<f32>,
}

/// Search response body.
#[derive(Debug, Clone, Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub results: Vec<CandidateResult>,
    pub total: usize,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(id: &str, url: &str) -> CandidateResult {
        CandidateResult {
            id: id.to_string(),
            title: "t".to_string(),
            description: "d".to_string(),
            source_url: url.to_string(),
            similarity: 0.5,
            score: None,
            provider: "test".to_string(),
            categories: None,
            tags: None,
            installations: None,
        }
    }

    #[test]
    fn test_dedup_key_prefers_source_url() {
        let c = candidate("id-1", "https://github.com/a/b");
        assert_eq!(c.dedup_key(), "https://github.com/a/b");
    }

    #[test]
    fn test_dedup_key_falls_back_to_id() {
        let c = candidate("id-1", "");
        assert_eq!(c.dedup_key(), "id-1");
    }

    #[test]
    fn test_search_text_joins_keywords() {
        let mut q = SearchQuery::new("manage kubernetes clusters");
        q.keywords = vec!["helm".to_string(), "kubectl".to_string()];
        assert_eq!(q.search_text(), "manage kubernetes clusters helm kubectl");
    }
}
