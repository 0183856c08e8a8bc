//! This module defines the `UserStateRepository` trait for per-user formula state.
use chrono::{DateTime, Utc};
use formula_shared::types::{FormulaId, StateFilter, StatePatch, UserFormulaState, UserId};

use crate::errors::RepositoryError;

/// Storage interface for per-user favorite and familiarity state.
#[async_trait::async_trait]
pub trait UserStateRepository: Send + Sync {
    /// Inserts or updates the state row for `(user_id, formula_id)` in one atomic step.
    ///
    /// When the row exists only the fields present in `patch` are written. When it does
    /// not, a row is created with `is_favorite = false` and `familiarity = new` for the
    /// fields the patch leaves out. Both paths stamp `updated_at` with `now`.
    ///
    /// Implementations must never produce two rows for the same pair, even when called
    /// concurrently.
    async fn upsert_state(
        &self,
        user_id: UserId,
        formula_id: FormulaId,
        patch: &StatePatch,
        now: DateTime<Utc>,
    ) -> Result<UserFormulaState, RepositoryError>;

    /// Lists a user's state rows in insertion order.
    async fn list_states(
        &self,
        user_id: UserId,
        filter: &StateFilter,
    ) -> Result<Vec<UserFormulaState>, RepositoryError>;
}
