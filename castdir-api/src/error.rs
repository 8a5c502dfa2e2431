//! Error types for castdir-api
//!
//! Client errors carry a short message; server errors are logged and
//! reported without internal detail.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::query::QueryError;
use crate::stats::StatsError;

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Resource not found (404)
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Invalid request (400)
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// Invalid list query parameters (400)
    #[error("Invalid list query: {0}")]
    Query(#[from] QueryError),

    /// Invalid statistics request or rendering failure
    #[error("Statistics error: {0}")]
    Stats(#[from] StatsError),

    /// castdir-common error, including storage failures (500)
    #[error("Common error: {0}")]
    Common(#[from] castdir_common::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ApiError::Query(_) => (StatusCode::BAD_REQUEST, "Inputs is invalid".to_string()),
            ApiError::Stats(StatsError::Render(_)) => {
                error!(error = %self, "Statistics chart rendering failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
            ApiError::Stats(_) => (StatusCode::BAD_REQUEST, "Input data is invalid".to_string()),
            ApiError::Common(_) => {
                error!(error = %self, "Request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        (status, Json(json!({ "message": message }))).into_response()
    }
}
