//! Errors returned by action handlers.
//!
//! Every failure maps onto one of a small set of kinds that the transport can
//! surface directly. Store failures stay opaque and are reported as `INTERNAL`.
use std::fmt;

use formula_repository::RepositoryError;
use serde::Serialize;
use thiserror::Error;

/// The record type an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ResourceKind {
    FormulaGroup,
    Formula,
    FormulaExample,
    UserFormulaState,
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ResourceKind::FormulaGroup => "formula group",
            ResourceKind::Formula => "formula",
            ResourceKind::FormulaExample => "formula example",
            ResourceKind::UserFormulaState => "user formula state",
        })
    }
}

/// Kind of an [`ActionError`], as reported to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    Unauthorized,
    NotFound,
    Forbidden,
    Validation,
    Internal,
}

/// Errors raised by action handlers.
#[derive(Debug, Error)]
pub enum ActionError {
    /// No authenticated user is present.
    #[error("Authentication required")]
    Unauthorized,

    #[error("{resource} {id} not found")]
    NotFound { resource: ResourceKind, id: i64 },

    /// The caller does not own the group gating the operation.
    #[error("Not allowed to modify {resource} {id}")]
    Forbidden { resource: ResourceKind, id: i64 },

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unknown procedure: {0}")]
    UnknownProcedure(String),

    #[error("Failed to encode response: {0}")]
    Encoding(String),

    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
}

impl ActionError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn not_found(resource: ResourceKind, id: i64) -> Self {
        Self::NotFound { resource, id }
    }

    pub fn forbidden(resource: ResourceKind, id: i64) -> Self {
        Self::Forbidden { resource, id }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ActionError::Unauthorized => ErrorKind::Unauthorized,
            ActionError::NotFound { .. } | ActionError::UnknownProcedure(_) => ErrorKind::NotFound,
            ActionError::Forbidden { .. } => ErrorKind::Forbidden,
            ActionError::Validation(_) => ErrorKind::Validation,
            ActionError::Encoding(_) | ActionError::Repository(_) => ErrorKind::Internal,
        }
    }

    /// Renders the error as `{ "success": false, "error": { "kind", "message" } }`.
    pub fn to_body(&self) -> serde_json::Value {
        serde_json::json!({
            "success": false,
            "error": {
                "kind": self.kind(),
                "message": self.to_string(),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds() {
        assert_eq!(ActionError::Unauthorized.kind(), ErrorKind::Unauthorized);
        assert_eq!(
            ActionError::not_found(ResourceKind::Formula, 3).kind(),
            ErrorKind::NotFound
        );
        assert_eq!(
            ActionError::UnknownProcedure("x.y".to_string()).kind(),
            ErrorKind::NotFound
        );
        assert_eq!(
            ActionError::forbidden(ResourceKind::FormulaGroup, 3).kind(),
            ErrorKind::Forbidden
        );
        assert_eq!(ActionError::validation("bad").kind(), ErrorKind::Validation);
        assert_eq!(
            ActionError::from(RepositoryError::DatabaseError(sqlx::Error::PoolTimedOut)).kind(),
            ErrorKind::Internal
        );
    }

    #[test]
    fn test_messages() {
        assert_eq!(
            ActionError::not_found(ResourceKind::FormulaGroup, 12).to_string(),
            "formula group 12 not found"
        );
        assert_eq!(
            ActionError::forbidden(ResourceKind::FormulaGroup, 12).to_string(),
            "Not allowed to modify formula group 12"
        );
    }

    #[test]
    fn test_error_body() {
        let body = ActionError::forbidden(ResourceKind::FormulaGroup, 4).to_body();
        assert_eq!(body["success"], serde_json::json!(false));
        assert_eq!(body["error"]["kind"], serde_json::json!("FORBIDDEN"));
        assert_eq!(
            body["error"]["message"],
            serde_json::json!("Not allowed to modify formula group 4")
        );
    }
}
