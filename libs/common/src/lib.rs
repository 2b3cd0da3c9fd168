//! Common library for the Sightline application
//!
//! This crate provides shared infrastructure used by the auth and
//! sightings services: PostgreSQL connectivity, the Redis-backed session
//! store, session cookie handling, and common error types.

pub mod cache;
pub mod cookie;
pub mod database;
pub mod error;
pub mod session;
