use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;

use crate::models::{SearchQuery, SearchRequest, SearchResponse};
use crate::search::rerank::RerankOptions;
use crate::state::AppState;

/// POST /api/search - fan out to all providers, rerank, respond.
///
/// Always answers with a best-effort (possibly empty) ranked list; provider
/// failures never surface here.
pub async fn search(
    State(state): State<AppState>,
    Json(req): Json<SearchRequest>,
) -> Result<Json<SearchResponse>, (StatusCode, String)> {
    let task_description = req.task_description.trim().to_string();
    if task_description.is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            "task_description is required".to_string(),
        ));
    }

    let request_id = uuid::Uuid::new_v4();
    let query = SearchQuery {
        task_description,
        keywords: req.keywords,
        capabilities: req.capabilities,
    };
    tracing::info!(%request_id, query = %query.task_description, "Search request");

    let options = RerankOptions {
        limit: Some(req.limit.unwrap_or(state.config.default_limit)),
        min_score: req.min_score.or(state.config.min_score),
        min_similarity: None,
    };

    let results = state.orchestrator.search(&query, &options).await;
    tracing::info!(%request_id, total = results.len(), "Search complete");

    Ok(Json(SearchResponse {
        query: query.task_description,
        total: results.len(),
        results,
        timestamp: chrono::Utc::now(),
    }))
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub providers: usize,
    pub offline_entries: usize,
    /// Health of the resilient full-text backend; absent when the backend
    /// is not configured.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backend_healthy: Option<bool>,
}

/// GET /api/health - liveness plus backend health for observability.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let backend_healthy = match &state.resilient {
        Some(resilient) => Some(resilient.health_check().await.unwrap_or(false)),
        None => None,
    };

    Json(HealthResponse {
        status: "ok",
        providers: state.orchestrator.provider_count(),
        offline_entries: state.store.len(),
        backend_healthy,
    })
}
