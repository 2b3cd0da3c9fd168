//! API models for request and response payloads

pub mod sighting;

pub use sighting::{CreateSighting, Sighting, UpdateSighting};
