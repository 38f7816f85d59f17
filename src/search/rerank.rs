use std::collections::HashMap;

use crate::models::{CandidateResult, ProviderResults};

/// Results returned when the caller does not ask for a specific limit.
pub const DEFAULT_LIMIT: usize = 10;

/// Ranking options for one rerank pass.
#[derive(Debug, Clone, Default)]
pub struct RerankOptions {
    pub limit: Option<usize>,
    /// Minimum effective score; entries below are dropped.
    pub min_score: Option<f32>,
    /// Legacy alias for `min_score`. Despite the name it is compared against
    /// the effective score, not the raw similarity.
    pub min_similarity: Option<f32>,
}

/// Merges provider result sets into one ranked, deduplicated list.
///
/// Effective score is the provider-supplied score when present, otherwise
/// `provider priority x similarity`. Priority defaults to 1 for unknown
/// providers. Note the product is not bounded to [0, 1] when priority > 1;
/// this scaling is kept as-is for compatibility with existing thresholds.
pub struct Reranker {
    priorities: HashMap<String, u32>,
}

impl Reranker {
    pub fn new(priorities: HashMap<String, u32>) -> Self {
        Self { priorities }
    }

    fn priority(&self, provider: &str) -> u32 {
        self.priorities.get(provider).copied().unwrap_or(1)
    }

    fn effective_score(&self, result: &CandidateResult) -> f32 {
        match result.score {
            Some(score) => score,
            None => self.priority(&result.provider) as f32 * result.similarity,
        }
    }

    /// Flatten, score, deduplicate, filter, sort, truncate. Pure: no side
    /// effects, deterministic for a given input order.
    pub fn rerank(
        &self,
        provider_results: &[ProviderResults],
        options: &RerankOptions,
    ) -> Vec<CandidateResult> {
        // Flatten, tagging each entry with its provider and effective score.
        // Scored holds (candidate, score, priority) in encounter order.
        let mut kept: Vec<(CandidateResult, f32, u32)> = Vec::new();
        let mut index_by_key: HashMap<String, usize> = HashMap::new();

        for pr in provider_results {
            for result in &pr.results {
                let mut candidate = result.clone();
                candidate.provider = pr.provider.clone();
                let score = self.effective_score(&candidate);
                let priority = self.priority(&pr.provider);
                let key = candidate.dedup_key().to_string();

                match index_by_key.get(&key) {
                    None => {
                        index_by_key.insert(key, kept.len());
                        kept.push((candidate, score, priority));
                    }
                    Some(&i) => {
                        let (_, kept_score, kept_priority) = kept[i];
                        // Higher score wins; on a score tie the higher-priority
                        // provider wins; a full tie keeps the first seen.
                        if score > kept_score || (score == kept_score && priority > kept_priority)
                        {
                            kept[i] = (candidate, score, priority);
                        }
                    }
                }
            }
        }

        let threshold = options.min_score.or(options.min_similarity);
        let mut results: Vec<(CandidateResult, f32)> = kept
            .into_iter()
            .filter(|(_, score, _)| threshold.is_none_or(|t| *score >= t))
            .map(|(candidate, score, _)| (candidate, score))
            .collect();

        // Vec::sort_by is stable, so equal scores preserve input order.
        results.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        results.truncate(options.limit.unwrap_or(DEFAULT_LIMIT));

        results
            .into_iter()
            .map(|(mut candidate, score)| {
                candidate.score = Some(score);
                candidate
            })
            .collect()
    }
}
