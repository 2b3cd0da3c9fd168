//! Application state shared across handlers

use common::session::SessionStore;
use sqlx::PgPool;

use crate::repositories::SightingRepository;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub sightings: SightingRepository,
    pub sessions: SessionStore,
    pub cookie_secure: bool,
}
