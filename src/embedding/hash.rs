use anyhow::Result;
use async_trait::async_trait;

use super::Embedder;
use crate::search::normalize::l2_normalize;

const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0100_0000_01b3;

/// Tokens shorter than this are dropped.
const MIN_TOKEN_LEN: usize = 2;

/// Deterministic hash-based embedder.
///
/// Each token FNV-1a-hashes to a single dimension, accumulating a sign
/// derived from the hash's high bit; the result is unit-normalized. Not
/// semantic (captures lexical overlap only), but requires no network or
/// model files, which makes it the offline fallback and the test double
/// for the search pipeline.
#[derive(Debug, Clone)]
pub struct HashEmbedder {
    dim: usize,
}

impl HashEmbedder {
    pub fn new(dim: usize) -> Self {
        assert!(dim > 0, "embedding dimension must be > 0");
        Self { dim }
    }

    pub fn embed_sync(&self, text: &str) -> Vec<f32> {
        let mut embedding = vec![0.0f32; self.dim];

        for token in tokenize(text) {
            let hash = fnv1a(token.as_bytes());
            let index = (hash % self.dim as u64) as usize;
            let sign = if hash >> 63 == 0 { 1.0 } else { -1.0 };
            embedding[index] += sign;
        }

        l2_normalize(&embedding)
    }
}

#[async_trait]
impl Embedder for HashEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        Ok(self.embed_sync(text))
    }

    fn dim(&self) -> usize {
        self.dim
    }
}

fn fnv1a(bytes: &[u8]) -> u64 {
    let mut hash = FNV_OFFSET;
    for &b in bytes {
        hash ^= u64::from(b);
        hash = hash.wrapping_mul(FNV_PRIME);
    }
    hash
}

/// Lowercased alphanumeric tokens of at least `MIN_TOKEN_LEN` chars.
fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| t.len() >= MIN_TOKEN_LEN)
        .map(String::from)
        .collect()
}
