//! Session checks for protected handlers
//!
//! Handlers call [`require_session`] themselves instead of going
//! through a router layer, so each one decides what to do with the
//! resolved user id.

use axum::http::HeaderMap;
use uuid::Uuid;

use common::cookie::extract_session_token;

use crate::{error::ApiError, state::AppState};

/// Resolve the session cookie to a user id, or reject with a 401
///
/// Expired and unknown tokens fail the same way as a missing cookie.
pub async fn require_session(state: &AppState, headers: &HeaderMap) -> Result<Uuid, ApiError> {
    let token = extract_session_token(headers).ok_or(ApiError::NotAuthenticated)?;

    let session = state
        .sessions
        .validate(&token)
        .await
        .ok_or(ApiError::NotAuthenticated)?;

    Ok(session.user_id)
}
