use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use super::error::{ApiError, ApiResult};
use super::AppState;
use crate::jobs::{JobRecord, SearchRequest, SourceId, DEFAULT_REGION};

/// Query string of `GET /api/jobs`.
#[derive(Debug, Default, Deserialize)]
pub struct JobsQuery {
    /// Free-text filter
    #[serde(default)]
    pub q: String,
    /// Accepted but not applied
    pub region: Option<String>,
    /// `"true"` enables the entry-level filter; any other value disables it
    pub entry: Option<String>,
}

impl From<JobsQuery> for SearchRequest {
    fn from(query: JobsQuery) -> Self {
        SearchRequest {
            query: query.q,
            region: query
                .region
                .filter(|r| !r.is_empty())
                .unwrap_or_else(|| DEFAULT_REGION.to_string()),
            entry_only: query.entry.as_deref() == Some("true"),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct JobsResponse {
    pub jobs: Vec<JobRecord>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SourceEntry {
    pub id: SourceId,
    pub url: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SourcesResponse {
    pub sources: Vec<SourceEntry>,
}

/// `GET /api/jobs?q=&region=&entry=`
///
/// The search runs on its own task so a panic inside it becomes a 500
/// instead of tearing down the connection; no partial results are returned.
pub async fn search_jobs(
    State(state): State<AppState>,
    query: Result<Query<JobsQuery>, QueryRejection>,
) -> ApiResult<Json<JobsResponse>> {
    let Query(query) = query.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let request = SearchRequest::from(query);

    let aggregator = state.aggregator.clone();
    let jobs = tokio::spawn(async move { aggregator.aggregate(&request).await })
        .await
        .map_err(|e| ApiError::Internal(format!("search task failed: {e}")))??;

    Ok(Json(JobsResponse { jobs }))
}

/// `GET /api/sources` lists the configured feeds in polling order.
pub async fn list_sources(State(state): State<AppState>) -> Json<SourcesResponse> {
    let sources = state
        .aggregator
        .registry()
        .iter()
        .map(|s| SourceEntry {
            id: s.id.clone(),
            url: s.url.clone(),
        })
        .collect();
    Json(SourcesResponse { sources })
}
