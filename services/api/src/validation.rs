//! Input validation for sighting payloads

use regex::Regex;
use std::collections::BTreeMap;
use std::sync::OnceLock;

use crate::models::sighting::{CreateSighting, UpdateSighting};

/// Field-keyed validation error messages
pub type FieldErrors = BTreeMap<String, String>;

/// Upper bound on a base64 photo payload, roughly 2MB of image data
pub const PHOTO_URL_MAX_CHARS: usize = 2_900_000;

fn photo_url_regex() -> &'static Regex {
    static PHOTO_URL_REGEX: OnceLock<Regex> = OnceLock::new();
    PHOTO_URL_REGEX.get_or_init(|| {
        Regex::new(r"^data:image/(jpeg|jpg|png|webp);base64,")
            .expect("Failed to compile photo url regex")
    })
}

/// Validate and trim an animal name
pub fn validate_animal_name(name: &str) -> Result<String, String> {
    let name = name.trim();

    if name.is_empty() {
        return Err("Animal name is required".to_string());
    }

    if name.chars().count() > 200 {
        return Err("Animal name must be at most 200 characters long".to_string());
    }

    Ok(name.to_string())
}

/// Validate and trim a location
pub fn validate_location(location: &str) -> Result<String, String> {
    let location = location.trim();

    if location.is_empty() {
        return Err("Location is required".to_string());
    }

    if location.chars().count() > 500 {
        return Err("Location must be at most 500 characters long".to_string());
    }

    Ok(location.to_string())
}

/// Validate an inline base64 photo
pub fn validate_photo_url(photo_url: &str) -> Result<(), String> {
    if !photo_url_regex().is_match(photo_url) {
        return Err("Photo must be a valid base64 data URL (JPEG, PNG, or WebP)".to_string());
    }

    if photo_url.len() > PHOTO_URL_MAX_CHARS {
        return Err("Photo must be less than 2MB (base64 encoded)".to_string());
    }

    Ok(())
}

/// Validate a create payload; returns trimmed (animal_name, location)
pub fn validate_create(payload: &CreateSighting) -> Result<(String, String), FieldErrors> {
    let mut errors = FieldErrors::new();

    let animal_name = match validate_animal_name(&payload.animal_name) {
        Ok(name) => Some(name),
        Err(msg) => {
            errors.insert("animal_name".to_string(), msg);
            None
        }
    };

    let location = match validate_location(&payload.location) {
        Ok(location) => Some(location),
        Err(msg) => {
            errors.insert("location".to_string(), msg);
            None
        }
    };

    if let Some(photo_url) = &payload.photo_url {
        if let Err(msg) = validate_photo_url(photo_url) {
            errors.insert("photo_url".to_string(), msg);
        }
    }

    match (animal_name, location) {
        (Some(animal_name), Some(location)) if errors.is_empty() => Ok((animal_name, location)),
        _ => Err(errors),
    }
}

/// Validate an update payload's present fields
///
/// An explicit `"photo_url": null` is a valid clear and is not checked
/// against the data-URL rules.
pub fn validate_update(payload: &UpdateSighting) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::new();

    if let Some(animal_name) = &payload.animal_name {
        if let Err(msg) = validate_animal_name(animal_name) {
            errors.insert("animal_name".to_string(), msg);
        }
    }

    if let Some(location) = &payload.location {
        if let Err(msg) = validate_location(location) {
            errors.insert("location".to_string(), msg);
        }
    }

    if let Some(Some(photo_url)) = &payload.photo_url {
        if let Err(msg) = validate_photo_url(photo_url) {
            errors.insert("photo_url".to_string(), msg);
        }
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}
