//! Custom error types for the API service

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::validation::FieldErrors;

/// Custom error type for the API service
#[derive(Error, Debug)]
pub enum ApiError {
    /// Malformed payload, one message per offending field
    #[error("Validation failed")]
    Validation(FieldErrors),

    /// Structurally valid request that cannot be honored
    #[error("{0}")]
    BadRequest(String),

    /// Missing, invalid, or expired session
    #[error("Not authenticated")]
    NotAuthenticated,

    /// The sighting exists but belongs to someone else
    #[error("Not authorized to access this sighting")]
    Forbidden,

    /// No visible sighting under this id
    #[error("Sighting not found")]
    NotFound,

    /// Unexpected store failure; detail is logged, not returned
    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::Validation(_) | ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotAuthenticated => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden => StatusCode::FORBIDDEN,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if let ApiError::Internal(e) = &self {
            tracing::error!(error = %e, "API service internal error");
        }

        let body = match &self {
            ApiError::Validation(details) => json!({
                "error": self.to_string(),
                "details": details,
            }),
            _ => json!({ "error": self.to_string() }),
        };

        (status, Json(body)).into_response()
    }
}

/// Type alias for API results
pub type ApiResult<T> = Result<T, ApiError>;
