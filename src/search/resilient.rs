use anyhow::Result;
use std::sync::Arc;

use crate::config::{BackendConfig, BackendKind};
use crate::search::fulltext::{EngineClient, HttpEngineClient, SearchOutcome};

/// Failover wrapper around a primary full-text backend and an optional
/// cloud fallback.
///
/// Failover is purely reactive: the fallback is tried only after the
/// primary's call fails, and nothing pre-emptively reroutes traffic. When
/// both legs fail, the fallback's error propagates, since that is the one
/// describing the last attempt.
pub struct ResilientClient {
    primary: Arc<dyn EngineClient>,
    fallback: Option<Arc<dyn EngineClient>>,
}

impl ResilientClient {
    pub fn new(primary: Arc<dyn EngineClient>, fallback: Option<Arc<dyn EngineClient>>) -> Self {
        Self { primary, fallback }
    }

    /// Resolve clients from config: a `local` active backend gets the cloud
    /// config as its fallback; a `cloud` primary runs without one.
    pub fn from_config(
        active: &BackendConfig,
        cloud_fallback: Option<&BackendConfig>,
        client: &reqwest::Client,
    ) -> Self {
        let primary: Arc<dyn EngineClient> =
            Arc::new(HttpEngineClient::new(active.clone(), client.clone()));

        let fallback = match (active.kind, cloud_fallback) {
            (BackendKind::Local, Some(cfg)) => {
                let fb: Arc<dyn EngineClient> =
                    Arc::new(HttpEngineClient::new(cfg.clone(), client.clone()));
                Some(fb)
            }
            _ => None,
        };

        Self { primary, fallback }
    }

    pub fn has_fallback(&self) -> bool {
        self.fallback.is_some()
    }

    pub async fn search(&self, text: &str, limit: usize) -> Result<SearchOutcome> {
        match self.primary.search(text, limit).await {
            Ok(outcome) => Ok(outcome),
            Err(primary_err) => match &self.fallback {
                Some(fallback) => {
                    tracing::warn!(
                        backend = self.primary.label(),
                        error = %primary_err,
                        "Primary search backend failed, trying fallback"
                    );
                    fallback.search(text, limit).await
                }
                None => Err(primary_err),
            },
        }
    }

    pub async fn health_check(&self) -> Result<bool> {
        match self.primary.health_check().await {
            Ok(healthy) => Ok(healthy),
            Err(primary_err) => match &self.fallback {
                Some(fallback) => {
                    tracing::warn!(
                        backend = self.primary.label(),
                        error = %primary_err,
                        "Primary health check failed, trying fallback"
                    );
                    fallback.health_check().await
                }
                None => Err(primary_err),
            },
        }
    }
}
