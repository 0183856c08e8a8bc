//! Error types for the formula repository.
//! Defines specific errors that can occur during database operations.
use formula_shared::types::ParseLiteralError;
use thiserror::Error;

/// Represents errors that can occur within the formula repository.
///
/// Store failures are opaque to callers: they are propagated as-is and never
/// translated into domain errors.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Invalid difficulty: {0}")]
    InvalidDifficulty(String),

    #[error("Invalid familiarity: {0}")]
    InvalidFamiliarity(String),
}

impl RepositoryError {
    /// Maps a stored enum literal that failed to parse onto the matching variant.
    pub(crate) fn invalid_literal(err: ParseLiteralError) -> Self {
        match err.kind {
            "familiarity" => Self::InvalidFamiliarity(err.value),
            _ => Self::InvalidDifficulty(err.value),
        }
    }
}
