//! This module defines the `GroupRepository` trait, which abstracts the storage of
//! formula groups.
use chrono::{DateTime, Utc};
use formula_shared::types::{FormulaGroup, GroupId, GroupPatch, NewGroup, UserId};

use crate::errors::RepositoryError;

/// A trait that defines the interface for storing formula groups.
///
/// Groups are never hard-deleted; archiving is an update of `is_active`.
#[async_trait::async_trait]
pub trait GroupRepository: Send + Sync {
    /// Inserts a new group and returns the stored row.
    async fn insert_group(&self, group: NewGroup) -> Result<FormulaGroup, RepositoryError>;

    /// Fetches a group by id. Returns `Ok(None)` when it does not exist.
    async fn get_group(&self, id: GroupId) -> Result<Option<FormulaGroup>, RepositoryError>;

    /// Applies the fields present in `patch` and stamps `updated_at` with `now`.
    ///
    /// # Returns
    ///
    /// * `Ok(Some(group))` - The updated row
    /// * `Ok(None)` - No group with this id exists
    /// * `Err(RepositoryError)` - Database failure
    async fn update_group(
        &self,
        id: GroupId,
        patch: &GroupPatch,
        now: DateTime<Utc>,
    ) -> Result<Option<FormulaGroup>, RepositoryError>;

    /// Lists groups owned by `owner_id`, newest first.
    async fn list_groups_by_owner(
        &self,
        owner_id: UserId,
        include_inactive: bool,
    ) -> Result<Vec<FormulaGroup>, RepositoryError>;
}
