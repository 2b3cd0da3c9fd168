//! Sightings API service for the Sightline application
//!
//! Serves `/api/sightings`: create, list, fetch, update, and delete
//! wildlife sightings. Every route requires a valid session cookie,
//! and a sighting is only visible to the account that recorded it.

pub mod error;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod state;
pub mod validation;

pub use state::AppState;
