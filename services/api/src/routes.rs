//! API service routes
//!
//! Access checks run in a fixed order: session, payload validation,
//! existence, then ownership. A sighting that exists but belongs to
//! another user is a 403, never a 404.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::get,
};
use serde_json::json;
use uuid::Uuid;

use crate::{
    AppState,
    error::{ApiError, ApiResult},
    middleware::require_session,
    models::sighting::{CreateSighting, Sighting, UpdateSighting},
    validation::{validate_create, validate_update},
};

/// Create the router for the API service
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/api/sightings", get(list_sightings).post(create_sighting))
        .route(
            "/api/sightings/:id",
            get(get_sighting)
                .patch(update_sighting)
                .delete(delete_sighting),
        )
        .with_state(state)
}

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": "api"
    }))
}

/// POST /api/sightings
pub async fn create_sighting(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<CreateSighting>,
) -> ApiResult<impl IntoResponse> {
    let user_id = require_session(&state, &headers).await?;

    let (animal_name, location) = validate_create(&payload).map_err(ApiError::Validation)?;

    let sighting = state
        .sightings
        .create(
            user_id,
            &animal_name,
            &location,
            payload.photo_url.as_deref(),
        )
        .await?;

    Ok((StatusCode::CREATED, Json(json!({ "sighting": sighting }))))
}

/// GET /api/sightings
pub async fn list_sightings(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<impl IntoResponse> {
    let user_id = require_session(&state, &headers).await?;

    let sightings = state.sightings.list_for_user(user_id).await?;

    Ok(Json(json!({ "sightings": sightings })))
}

/// GET /api/sightings/:id
pub async fn get_sighting(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    let user_id = require_session(&state, &headers).await?;

    let sighting = fetch_owned(&state, id, user_id).await?;

    Ok(Json(json!({ "sighting": sighting })))
}

/// PATCH /api/sightings/:id
pub async fn update_sighting(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateSighting>,
) -> ApiResult<impl IntoResponse> {
    let user_id = require_session(&state, &headers).await?;

    if payload.is_empty() {
        return Err(ApiError::BadRequest("No fields to update".to_string()));
    }

    validate_update(&payload).map_err(ApiError::Validation)?;

    let existing = fetch_owned(&state, id, user_id).await?;

    // Merge present fields over the stored row
    let animal_name = match &payload.animal_name {
        Some(name) => name.trim().to_string(),
        None => existing.animal_name,
    };
    let location = match &payload.location {
        Some(location) => location.trim().to_string(),
        None => existing.location,
    };
    let photo_url = match payload.photo_url {
        Some(photo_url) => photo_url,
        None => existing.photo_url,
    };

    // The row can vanish between the fetch and the write
    let sighting = state
        .sightings
        .update(id, &animal_name, &location, photo_url.as_deref())
        .await?
        .ok_or(ApiError::NotFound)?;

    Ok(Json(json!({ "sighting": sighting })))
}

/// DELETE /api/sightings/:id
pub async fn delete_sighting(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    let user_id = require_session(&state, &headers).await?;

    fetch_owned(&state, id, user_id).await?;

    if !state.sightings.soft_delete(id).await? {
        return Err(ApiError::NotFound);
    }

    Ok(StatusCode::NO_CONTENT)
}

/// Fetch a sighting, distinguishing missing (404) from foreign (403)
async fn fetch_owned(state: &AppState, id: Uuid, user_id: Uuid) -> ApiResult<Sighting> {
    let sighting = state
        .sightings
        .find_by_id(id)
        .await?
        .ok_or(ApiError::NotFound)?;

    if sighting.user_id != user_id {
        return Err(ApiError::Forbidden);
    }

    Ok(sighting)
}
