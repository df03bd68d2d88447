//! Use-case layer: validate input, delegate to the store, return the entity.

pub mod deals;
pub mod executives;
pub mod indicators;
pub mod meetings;
pub mod report_tokens;
pub mod startups;

use crate::error::{AppError, AppResult};

/// Checks a required text field is non-empty and at most `max` characters.
fn require_text(field: &str, value: &str, max: usize) -> AppResult<()> {
    if value.is_empty() {
        return Err(AppError::Validation(format!("{field} must not be empty")));
    }
    limit_text(field, Some(value), max)
}

fn limit_text(field: &str, value: Option<&str>, max: usize) -> AppResult<()> {
    match value {
        Some(text) if text.chars().count() > max => Err(AppError::Validation(format!(
            "{field} must be at most {max} characters"
        ))),
        _ => Ok(()),
    }
}

/// Same as [`limit_text`] for a PATCH field that may be absent, null or set.
fn limit_patch(field: &str, value: &Option<Option<String>>, max: usize) -> AppResult<()> {
    limit_text(field, value.as_ref().and_then(|inner| inner.as_deref()), max)
}
