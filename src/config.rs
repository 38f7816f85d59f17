use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Which deployment of the full-text backend a config points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendKind {
    Local,
    Cloud,
}

/// Connection settings for one full-text backend deployment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    pub kind: BackendKind,
    /// Base URL, e.g. "http://127.0.0.1:7700".
    pub host: String,
    pub api_key: Option<String>,
    pub index_name: String,
}

/// Credentials for the service-registry provider. The provider is skipped
/// at startup when this is absent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistryConfig {
    pub server_addr: String,
    pub username: String,
    pub password: String,
}

/// Settings for the embedding backend used by the offline vector provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbedderConfig {
    /// "hash" (deterministic, no network), "ollama", or "openai".
    pub provider: String,
    /// Base URL for the HTTP embedding API.
    pub base_url: String,
    pub model: String,
    pub api_key: Option<String>,
    /// Embedding vector dimension.
    pub dim: usize,
}

impl Default for EmbedderConfig {
    fn default() -> Self {
        Self {
            provider: "hash".to_string(),
            base_url: "http://localhost:11434".to_string(),
            model: "nomic-embed-text".to_string(),
            api_key: None,
            dim: 384,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server bind address.
    pub bind_addr: String,
    /// Active full-text backend. None disables the fulltext provider.
    pub backend: Option<BackendConfig>,
    /// Cloud fallback for a `local` active backend. Resolved once at startup;
    /// ignored when the active backend is already `cloud`.
    pub backend_fallback: Option<BackendConfig>,
    /// Base URL of the remote recommendation API. None disables the provider.
    pub recommend_base_url: Option<String>,
    /// Service-registry credentials. None disables the registry provider.
    pub registry: Option<RegistryConfig>,
    /// Catalog source URLs for the offline vector provider.
    pub catalog_urls: Vec<String>,
    /// Ranking weight per provider name; unknown providers default to 1.
    pub provider_priorities: HashMap<String, u32>,
    /// Default result limit when the request does not set one.
    pub default_limit: usize,
    /// Minimum effective score; entries below are dropped. None disables filtering.
    pub min_score: Option<f32>,
    /// Catalog cache TTL in milliseconds.
    pub cache_ttl_ms: u64,
    /// Per-provider search timeout in seconds.
    pub provider_timeout_secs: u64,
    pub embedder: EmbedderConfig,
}

impl Default for Config {
    fn default() -> Self {
        let mut provider_priorities = HashMap::new();
        provider_priorities.insert("fulltext".to_string(), 2);

        Self {
            bind_addr: "127.0.0.1:9900".to_string(),
            backend: None,
            backend_fallback: None,
            recommend_base_url: None,
            registry: None,
            catalog_urls: Vec::new(),
            provider_priorities,
            default_limit: 10,
            min_score: None,
            cache_ttl_ms: 3_600_000, // one hour
            provider_timeout_secs: 10,
            embedder: EmbedderConfig::default(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(addr) = std::env::var("MCP_DISCOVERY_BIND_ADDR") {
            config.bind_addr = addr;
        }

        // Active full-text backend; a `local` active backend picks up the
        // cloud settings as its failover target.
        if let Ok(host) = std::env::var("SEARCH_BACKEND_HOST") {
            let kind = match std::env::var("SEARCH_BACKEND_KIND").as_deref() {
                Ok("cloud") => BackendKind::Cloud,
                _ => BackendKind::Local,
            };
            let index_name = std::env::var("SEARCH_BACKEND_INDEX")
                .unwrap_or_else(|_| "mcp-servers".to_string());
            config.backend = Some(BackendConfig {
                kind,
                host,
                api_key: std::env::var("SEARCH_BACKEND_API_KEY").ok(),
                index_name: index_name.clone(),
            });

            if kind == BackendKind::Local {
                if let Ok(cloud_host) = std::env::var("SEARCH_BACKEND_CLOUD_HOST") {
                    config.backend_fallback = Some(BackendConfig {
                        kind: BackendKind::Cloud,
                        host: cloud_host,
                        api_key: std::env::var("SEARCH_BACKEND_CLOUD_API_KEY").ok(),
                        index_name: std::env::var("SEARCH_BACKEND_CLOUD_INDEX")
                            .unwrap_or(index_name),
                    });
                }
            }
        }

        if let Ok(url) = std::env::var("RECOMMEND_API_BASE_URL") {
            config.recommend_base_url = Some(url);
        }

        // Registry provider requires the full credential set; partial
        // configuration is treated as absent.
        if let (Ok(server_addr), Ok(username), Ok(password)) = (
            std::env::var("REGISTRY_SERVER_ADDR"),
            std::env::var("REGISTRY_USERNAME"),
            std::env::var("REGISTRY_PASSWORD"),
        ) {
            config.registry = Some(RegistryConfig {
                server_addr,
                username,
                password,
            });
        }

        if let Ok(urls) = std::env::var("CATALOG_URLS") {
            config.catalog_urls = urls
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect();
        }

        // "name=weight,name=weight"
        if let Ok(raw) = std::env::var("PROVIDER_PRIORITIES") {
            for pair in raw.split(',') {
                if let Some((name, weight)) = pair.split_once('=') {
                    if let Ok(w) = weight.trim().parse::<u32>() {
                        config
                            .provider_priorities
                            .insert(name.trim().to_string(), w);
                    }
                }
            }
        }

        if let Ok(val) = std::env::var("MCP_DISCOVERY_LIMIT") {
            if let Ok(v) = val.parse() {
                config.default_limit = v;
            }
        }
        if let Ok(val) = std::env::var("MCP_DISCOVERY_MIN_SCORE") {
            if let Ok(v) = val.parse() {
                config.min_score = Some(v);
            }
        }
        if let Ok(val) = std::env::var("MCP_DISCOVERY_CACHE_TTL_MS") {
            if let Ok(v) = val.parse() {
                config.cache_ttl_ms = v;
            }
        }
        if let Ok(val) = std::env::var("MCP_DISCOVERY_PROVIDER_TIMEOUT_SECS") {
            if let Ok(v) = val.parse() {
                config.provider_timeout_secs = v;
            }
        }

        if let Ok(provider) = std::env::var("EMBEDDER_PROVIDER") {
            config.embedder.provider = provider;
        }
        if let Ok(url) = std::env::var("EMBEDDER_BASE_URL") {
            config.embedder.base_url = url;
        }
        if let Ok(model) = std::env::var("EMBEDDER_MODEL") {
            config.embedder.model = model;
        }
        if let Ok(key) = std::env::var("EMBEDDER_API_KEY") {
            config.embedder.api_key = Some(key);
        }
        if let Ok(dim) = std::env::var("EMBEDDER_DIM") {
            if let Ok(d) = dim.parse() {
                config.embedder.dim = d;
            }
        }

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_priorities_bias_fulltext() {
        let config = Config::default();
        assert_eq!(config.provider_priorities.get("fulltext"), Some(&2));
        assert!(!config.provider_priorities.contains_key("offline"));
    }
}
