//! Input validation for auth payloads
//!
//! Each endpoint validates its body before any store access. Failures
//! are collected into one message per offending field.

use regex::Regex;
use std::collections::BTreeMap;
use std::sync::OnceLock;

/// Field-keyed validation error messages
pub type FieldErrors = BTreeMap<String, String>;

fn email_regex() -> &'static Regex {
    static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
    EMAIL_REGEX.get_or_init(|| {
        Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
            .expect("Failed to compile email regex")
    })
}

/// Validate and normalize an email address: trimmed, lowercased
pub fn validate_email(email: &str) -> Result<String, String> {
    let email = email.trim().to_lowercase();

    if email.is_empty() {
        return Err("Email is required".to_string());
    }

    if email.len() > 254 {
        return Err("Email must be at most 254 characters long".to_string());
    }

    if !email_regex().is_match(&email) {
        return Err("Invalid email address".to_string());
    }

    Ok(email)
}

/// Validate password strength for signup: 8+ chars, one uppercase
pub fn validate_password(password: &str) -> Result<(), String> {
    if password.len() < 8 {
        return Err("Password must be at least 8 characters".to_string());
    }

    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        return Err("Password must contain at least one uppercase letter".to_string());
    }

    Ok(())
}

/// Signin only requires a non-empty password
pub fn validate_password_present(password: &str) -> Result<(), String> {
    if password.is_empty() {
        return Err("Password is required".to_string());
    }

    Ok(())
}

/// Validate a signup payload; returns the normalized email
pub fn validate_signup(email: &str, password: &str) -> Result<String, FieldErrors> {
    let mut errors = FieldErrors::new();

    let normalized = match validate_email(email) {
        Ok(email) => Some(email),
        Err(msg) => {
            errors.insert("email".to_string(), msg);
            None
        }
    };

    if let Err(msg) = validate_password(password) {
        errors.insert("password".to_string(), msg);
    }

    match normalized {
        Some(email) if errors.is_empty() => Ok(email),
        _ => Err(errors),
    }
}

/// Validate a signin payload; returns the normalized email
///
/// Password strength is not re-checked here, only presence.
pub fn validate_signin(email: &str, password: &str) -> Result<String, FieldErrors> {
    let mut errors = FieldErrors::new();

    let normalized = match validate_email(email) {
        Ok(email) => Some(email),
        Err(msg) => {
            errors.insert("email".to_string(), msg);
            None
        }
    };

    if let Err(msg) = validate_password_present(password) {
        errors.insert("password".to_string(), msg);
    }

    match normalized {
        Some(email) if errors.is_empty() => Ok(email),
        _ => Err(errors),
    }
}
