//! Pluggable text-to-vector backends.
//!
//! The offline search engine never picks its own embedder; callers choose
//! one at construction time. [`HashEmbedder`] is the always-available
//! deterministic fallback for environments without network or model access;
//! [`HttpEmbedder`] talks to an Ollama or OpenAI-compatible embedding API.

mod hash;
mod http;

pub use hash::HashEmbedder;
pub use http::HttpEmbedder;

use anyhow::Result;
use async_trait::async_trait;

use crate::config::EmbedderConfig;

/// A text-to-vector function. Output dimension is fixed per instance.
#[async_trait]
pub trait Embedder: Send + Sync {
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let mut out = Vec::with_capacity(texts.len());
        for text in texts {
            out.push(self.embed(text).await?);
        }
        Ok(out)
    }

    fn dim(&self) -> usize;
}

/// Build the embedder selected by config.
pub fn build_embedder(
    config: &EmbedderConfig,
    client: &reqwest::Client,
) -> Result<std::sync::Arc<dyn Embedder>> {
    match config.provider.as_str() {
        "hash" => Ok(std::sync::Arc::new(HashEmbedder::new(config.dim))),
        "ollama" | "openai" => Ok(std::sync::Arc::new(HttpEmbedder::new(
            config.clone(),
            client.clone(),
        ))),
        other => anyhow::bail!("Unknown embedder provider: {other}"),
    }
}
