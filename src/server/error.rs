use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::jobs::AggregationError;

/// Errors surfaced by the HTTP API.
///
/// Per-feed failures never reach this type; they are absorbed by the aggregator.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Request parameters were rejected before any feed was fetched
    #[error("{0}")]
    BadRequest(String),

    /// Anything else that stopped the search as a whole
    #[error("{0}")]
    Internal(String),
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

impl From<AggregationError> for ApiError {
    fn from(e: AggregationError) -> Self {
        match e {
            AggregationError::QueryTooLong { .. } | AggregationError::InvalidQuery => {
                ApiError::BadRequest(e.to_string())
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => {
                tracing::warn!(error = %msg, "Rejected job search request");
                (StatusCode::BAD_REQUEST, msg)
            }
            ApiError::Internal(msg) => {
                tracing::error!(error = %msg, "Job search failed");
                // Details stay in the log
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Failed to fetch jobs".to_string(),
                )
            }
        };

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
