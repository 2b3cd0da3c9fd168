//! Custom error types for the auth service

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::validation::FieldErrors;

/// Custom error type for the auth service
#[derive(Error, Debug)]
pub enum AuthError {
    /// Malformed payload, one message per offending field
    #[error("Validation failed")]
    Validation(FieldErrors),

    /// Email already belongs to an active account
    #[error("Email already registered")]
    EmailTaken,

    /// Bad email/password pair; never says which half was wrong
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// Missing, invalid, or expired session
    #[error("Not authenticated")]
    NotAuthenticated,

    /// The account behind a valid session no longer exists
    #[error("User not found")]
    UserNotFound,

    /// Unexpected store failure; detail is logged, not returned
    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = match &self {
            AuthError::Validation(_) => StatusCode::BAD_REQUEST,
            AuthError::EmailTaken => StatusCode::CONFLICT,
            AuthError::InvalidCredentials | AuthError::NotAuthenticated => {
                StatusCode::UNAUTHORIZED
            }
            AuthError::UserNotFound => StatusCode::NOT_FOUND,
            AuthError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if let AuthError::Internal(e) = &self {
            tracing::error!(error = %e, "Auth service internal error");
        }

        let body = match &self {
            AuthError::Validation(details) => json!({
                "error": self.to_string(),
                "details": details,
            }),
            AuthError::EmailTaken => json!({
                "error": self.to_string(),
                "details": { "email": "This email is already in use" },
            }),
            _ => json!({ "error": self.to_string() }),
        };

        (status, Json(body)).into_response()
    }
}

/// Type alias for auth results
pub type AuthResult<T> = Result<T, AuthError>;
