//! Repositories for database operations

pub mod sighting;

pub use sighting::SightingRepository;
