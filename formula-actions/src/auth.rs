//! Caller identity as handed over by the session collaborator.
use formula_shared::types::UserId;
use serde::{Deserialize, Serialize};

use crate::errors::ActionError;

/// The authenticated user of a request. Only the id is ever read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentUser {
    pub id: UserId,
}

impl CurrentUser {
    pub fn new(id: UserId) -> Self {
        Self { id }
    }
}

/// Returns the caller's id, or `Unauthorized` when no user is present.
pub fn authenticate(caller: Option<&CurrentUser>) -> Result<UserId, ActionError> {
    caller.map(|user| user.id).ok_or(ActionError::Unauthorized)
}
