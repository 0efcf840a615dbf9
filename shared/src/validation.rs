//! Input validation functions
//!
//! This module provides validation utilities for user input.
//! Field rules are plain functions; request types implement
//! [`ValidateInput`] by composing them.

use thiserror::Error;
use validator::ValidateEmail;

/// Maximum length of a display name
pub const MAX_NAME_LEN: usize = 100;
/// Maximum length of an email address
pub const MAX_EMAIL_LEN: usize = 255;
/// Maximum length of a password
pub const MAX_PASSWORD_LEN: usize = 128;
/// Maximum length of a post or comment title
pub const MAX_TITLE_LEN: usize = 200;
/// Maximum length of a post or comment body
pub const MAX_BODY_LEN: usize = 20_000;

/// Validate display name
pub fn validate_name(name: &str) -> Result<(), String> {
    if name.trim().is_empty() {
        return Err("Name is required".to_string());
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(format!("Name must be at most {} characters", MAX_NAME_LEN));
    }
    Ok(())
}

/// Validate email format
pub fn validate_email(email: &str) -> Result<(), String> {
    let email = email.trim();
    if email.is_empty() {
        return Err("Email is required".to_string());
    }
    if email.len() > MAX_EMAIL_LEN {
        return Err("Email too long".to_string());
    }
    if !email.validate_email() {
        return Err("Invalid email format".to_string());
    }
    Ok(())
}

/// Validate password
///
/// Only presence and an upper bound are enforced; the hash function
/// does not care about composition.
pub fn validate_password(password: &str) -> Result<(), String> {
    if password.is_empty() {
        return Err("Password is required".to_string());
    }
    if password.chars().count() > MAX_PASSWORD_LEN {
        return Err("Password too long".to_string());
    }
    Ok(())
}

/// Validate a post or comment title
pub fn validate_title(title: &str) -> Result<(), String> {
    if title.trim().is_empty() {
        return Err("Title is required".to_string());
    }
    if title.chars().count() > MAX_TITLE_LEN {
        return Err(format!("Title must be at most {} characters", MAX_TITLE_LEN));
    }
    Ok(())
}

/// Validate a post or comment body
pub fn validate_body(body: &str) -> Result<(), String> {
    if body.trim().is_empty() {
        return Err("Body is required".to_string());
    }
    if body.chars().count() > MAX_BODY_LEN {
        return Err(format!("Body must be at most {} characters", MAX_BODY_LEN));
    }
    Ok(())
}

/// Validate a reference to another resource
pub fn validate_reference_id(id: i64) -> Result<(), String> {
    if id <= 0 {
        return Err("Must reference an existing resource".to_string());
    }
    Ok(())
}

/// Normalize an email for storage and lookup
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Get a user-friendly display label for a field name
pub fn get_field_display_label(field: &str) -> &str {
    match field {
        "name" => "Name",
        "email" => "Email",
        "password" => "Password",
        "title" => "Title",
        "body" => "Body",
        "post_id" => "Post",
        _ => field,
    }
}

/// A validation failure tied to a request field
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: String,
    pub message: String,
    pub display_label: String,
}

impl ValidationError {
    pub fn new(field: &str, message: &str) -> Self {
        Self {
            field: field.to_string(),
            message: message.to_string(),
            display_label: get_field_display_label(field).to_string(),
        }
    }

    /// Format as user-friendly error message
    pub fn user_message(&self) -> String {
        format!("{}: {}", self.display_label, self.message)
    }
}

/// Request payloads that can check themselves before reaching a service
pub trait ValidateInput {
    fn validate(&self) -> Result<(), ValidationError>;
}

/// Run a field rule and tag its failure with the field name
pub fn check(field: &str, result: Result<(), String>) -> Result<(), ValidationError> {
    result.map_err(|message| ValidationError::new(field, &message))
}

/// Run a field rule only when the optional field is present
pub fn check_optional<T: ?Sized>(
    field: &str,
    value: Option<&T>,
    rule: impl FnOnce(&T) -> Result<(), String>,
) -> Result<(), ValidationError> {
    match value {
        Some(value) => check(field, rule(value)),
        None => Ok(()),
    }
}
