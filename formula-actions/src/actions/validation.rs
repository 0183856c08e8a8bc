//! Input checks applied before any store access.
use formula_shared::types::Variable;

use crate::errors::ActionError;

/// Ids are positive integers.
pub(crate) fn require_id(field: &str, id: i64) -> Result<(), ActionError> {
    if id <= 0 {
        return Err(ActionError::validation(format!(
            "{field} must be a positive integer"
        )));
    }
    Ok(())
}

pub(crate) fn optional_id(field: &str, id: Option<i64>) -> Result<(), ActionError> {
    match id {
        Some(id) => require_id(field, id),
        None => Ok(()),
    }
}

/// A required string: non-empty after trimming and at most `max` characters.
pub(crate) fn require_text(field: &str, value: &str, max: usize) -> Result<(), ActionError> {
    if value.trim().is_empty() {
        return Err(ActionError::validation(format!("{field} must not be empty")));
    }
    check_length(field, value, max)
}

/// An optional string only has its length checked.
pub(crate) fn optional_text(
    field: &str,
    value: Option<&str>,
    max: usize,
) -> Result<(), ActionError> {
    match value {
        Some(value) => check_length(field, value, max),
        None => Ok(()),
    }
}

/// A present patch field must satisfy the same rules as on create.
pub(crate) fn patched_text(
    field: &str,
    value: Option<&str>,
    max: usize,
) -> Result<(), ActionError> {
    match value {
        Some(value) => require_text(field, value, max),
        None => Ok(()),
    }
}

pub(crate) fn tags(values: Option<&[String]>, max: usize) -> Result<(), ActionError> {
    for tag in values.unwrap_or_default() {
        require_text("tag", tag, max)?;
    }
    Ok(())
}

pub(crate) fn variables(values: Option<&[Variable]>, max: usize) -> Result<(), ActionError> {
    for variable in values.unwrap_or_default() {
        require_text("variable symbol", &variable.symbol, max)?;
        optional_text("variable meaning", variable.meaning.as_deref(), max)?;
        optional_text("variable unit", variable.unit.as_deref(), max)?;
    }
    Ok(())
}

/// Update patches must carry at least one field.
pub(crate) fn non_empty_patch(is_empty: bool) -> Result<(), ActionError> {
    if is_empty {
        return Err(ActionError::validation("at least one field must be provided"));
    }
    Ok(())
}

fn check_length(field: &str, value: &str, max: usize) -> Result<(), ActionError> {
    let length = value.chars().count();
    if length > max {
        return Err(ActionError::validation(format!(
            "{field} must be at most {max} characters, got {length}"
        )));
    }
    Ok(())
}
