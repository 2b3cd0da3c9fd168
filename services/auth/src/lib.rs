//! Authentication service for the Sightline application
//!
//! Serves `/api/auth/*`: account signup, signin, signout, and the
//! current-user lookup. Passwords are argon2-hashed before storage;
//! sessions live in Redis and travel in an HttpOnly cookie.

pub mod error;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod validation;

use common::session::SessionStore;
use sqlx::PgPool;

use crate::repositories::UserRepository;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub users: UserRepository,
    pub sessions: SessionStore,
    pub cookie_secure: bool,
}
