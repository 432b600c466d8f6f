//! Input validation for names and descriptions.
//!
//! The store cannot trust its callers, so every user-supplied string passes
//! through here before it reaches SQL.

use crate::error::{Result, TodoError};

/// Longest accepted list name or item description, in characters.
pub const MAX_TEXT_LEN: usize = 500;

/// Trim `value` and reject it if empty or oversized.
///
/// # Errors
///
/// Returns [`TodoError::Validation`] naming `field`.
pub fn required_text(field: &str, value: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(TodoError::validation(field, format!("{field} cannot be empty")));
    }
    if trimmed.chars().count() > MAX_TEXT_LEN {
        return Err(TodoError::validation(
            field,
            format!("{field} is longer than {MAX_TEXT_LEN} characters"),
        ));
    }
    if trimmed.chars().any(|c| c.is_control() && c != '\t') {
        return Err(TodoError::validation(
            field,
            format!("{field} cannot contain control characters"),
        ));
    }
    Ok(trimmed.to_string())
}

/// Validate a list name.
///
/// # Errors
///
/// See [`required_text`].
pub fn list_name(name: &str) -> Result<String> {
    required_text("name", name)
}

/// Validate an item description.
///
/// # Errors
///
/// See [`required_text`].
pub fn item_description(description: &str) -> Result<String> {
    required_text("description", description)
}
