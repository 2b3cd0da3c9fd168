//! Authentication service routes
//!
//! Each protected handler performs its own session check from the
//! cookie; there is no router-level auth layer.

use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::Deserialize;
use tracing::{info, warn};

use common::cookie::{clear_session_cookie, extract_session_token, session_cookie};

use crate::{
    AppState,
    error::{AuthError, AuthResult},
    models::user::{NewUser, UserResponse},
    validation::{validate_signin, validate_signup},
};

/// Request body for signup and signin
#[derive(Debug, Deserialize)]
pub struct CredentialsRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Create the router for the authentication service
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/api/auth/signup", post(sign_up))
        .route("/api/auth/signin", post(sign_in))
        .route("/api/auth/signout", post(sign_out))
        .route("/api/auth/me", get(current_user))
        .with_state(state)
}

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "auth"
    }))
}

/// POST /api/auth/signup
pub async fn sign_up(
    State(state): State<AppState>,
    Json(payload): Json<CredentialsRequest>,
) -> AuthResult<impl IntoResponse> {
    let email =
        validate_signup(&payload.email, &payload.password).map_err(AuthError::Validation)?;

    // Duplicate check is case-insensitive and ignores soft-deleted rows
    if state.users.find_active_by_email(&email).await?.is_some() {
        return Err(AuthError::EmailTaken);
    }

    // A signup racing past the check above loses at the unique index
    let user = state
        .users
        .create(&NewUser {
            email,
            password: payload.password,
        })
        .await?
        .ok_or(AuthError::EmailTaken)?;

    info!(user_id = %user.id, "New account registered");

    Ok((StatusCode::CREATED, Json(UserResponse::from(user))))
}

/// POST /api/auth/signin
pub async fn sign_in(
    State(state): State<AppState>,
    Json(payload): Json<CredentialsRequest>,
) -> AuthResult<impl IntoResponse> {
    let email =
        validate_signin(&payload.email, &payload.password).map_err(AuthError::Validation)?;

    // Unknown email and wrong password collapse into the same error
    let user = state
        .users
        .find_active_by_email(&email)
        .await?
        .ok_or(AuthError::InvalidCredentials)?;

    if !state.users.verify_password(&user, &payload.password)? {
        warn!(user_id = %user.id, "Failed sign-in attempt");
        return Err(AuthError::InvalidCredentials);
    }

    let last_login_at = state.users.record_login(user.id).await?;

    let token = state
        .sessions
        .create(user.id)
        .await
        .map_err(AuthError::Internal)?;

    let cookie = session_cookie(&token, state.sessions.ttl_seconds(), state.cookie_secure);

    info!(user_id = %user.id, "User signed in");

    let mut body = UserResponse::from(user);
    body.last_login_at = last_login_at;

    Ok((StatusCode::OK, [(header::SET_COOKIE, cookie)], Json(body)))
}

/// POST /api/auth/signout
///
/// Destroys the session (a no-op for stale tokens) and clears the
/// cookie. Only a request carrying no cookie at all gets a 401, so a
/// repeated signout with a stale cookie still succeeds.
pub async fn sign_out(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> AuthResult<impl IntoResponse> {
    let token = extract_session_token(&headers).ok_or(AuthError::NotAuthenticated)?;

    if let Err(e) = state.sessions.destroy(&token).await {
        // The record still self-expires via its TTL; clear the cookie anyway
        warn!(error = %e, "Failed to destroy session");
    }

    let cookie = clear_session_cookie(state.cookie_secure);

    Ok((StatusCode::NO_CONTENT, [(header::SET_COOKIE, cookie)]))
}

/// GET /api/auth/me
pub async fn current_user(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> AuthResult<Response> {
    let token = extract_session_token(&headers).ok_or(AuthError::NotAuthenticated)?;

    let session = match state.sessions.validate(&token).await {
        Some(session) => session,
        None => {
            // Stale token: clear the cookie while rejecting
            let cookie = clear_session_cookie(state.cookie_secure);
            return Ok((
                StatusCode::UNAUTHORIZED,
                [(header::SET_COOKIE, cookie)],
                Json(serde_json::json!({ "error": "Not authenticated" })),
            )
                .into_response());
        }
    };

    let user = state
        .users
        .find_active_by_id(session.user_id)
        .await?
        .ok_or(AuthError::UserNotFound)?;

    Ok(Json(UserResponse::from(user)).into_response())
}
