use chrono::Utc;
use formula_shared::types::{FormulaGroup, GroupId, GroupPatch, NewGroup};
use serde::Deserialize;
use tracing::{info, instrument};

use crate::actions::{validation, FormulaActions};
use crate::auth::{authenticate, CurrentUser};
use crate::envelope::{Envelope, GroupData, GroupList};
use crate::errors::{ActionError, ResourceKind};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateGroupInput {
    pub name: String,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub slug: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateGroupInput {
    pub id: GroupId,
    #[serde(flatten)]
    pub patch: GroupPatch,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct GroupIdInput {
    pub id: GroupId,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ListMyGroupsInput {
    pub include_inactive: bool,
}

impl FormulaActions {
    /// Creates a group owned by the caller.
    #[instrument(skip(self, input))]
    pub async fn create_group(
        &self,
        caller: Option<&CurrentUser>,
        input: CreateGroupInput,
    ) -> Result<Envelope<GroupData>, ActionError> {
        let user_id = authenticate(caller)?;
        let limits = &self.config;
        validation::require_text("name", &input.name, limits.max_name_length)?;
        validation::optional_text("subject", input.subject.as_deref(), limits.max_name_length)?;
        validation::tags(input.tags.as_deref(), limits.max_name_length)?;
        validation::optional_text(
            "description",
            input.description.as_deref(),
            limits.max_text_length,
        )?;
        validation::optional_text("slug", input.slug.as_deref(), limits.max_name_length)?;

        let group = self
            .repos
            .groups
            .insert_group(NewGroup {
                owner_id: Some(user_id),
                name: input.name,
                subject: input.subject,
                tags: input.tags,
                description: input.description,
                slug: input.slug,
                is_active: true,
                created_at: Utc::now(),
            })
            .await?;

        info!(
            group_id = group.id,
            user_id = user_id,
            "Formula group created"
        );
        Ok(Envelope::ok(GroupData { group }))
    }

    /// Applies a partial update to a group the caller may modify.
    #[instrument(skip(self, input), fields(group_id = input.id))]
    pub async fn update_group(
        &self,
        caller: Option<&CurrentUser>,
        input: UpdateGroupInput,
    ) -> Result<Envelope<GroupData>, ActionError> {
        let user_id = authenticate(caller)?;
        validation::require_id("id", input.id)?;
        self.validate_group_patch(&input.patch)?;

        self.resolver.resolve_group(input.id, user_id).await?;
        let group = self.write_group(input.id, &input.patch).await?;

        info!(
            group_id = group.id,
            user_id = user_id,
            "Formula group updated"
        );
        Ok(Envelope::ok(GroupData { group }))
    }

    /// Marks a group inactive. Archiving an archived group only refreshes `updatedAt`.
    #[instrument(skip(self, input), fields(group_id = input.id))]
    pub async fn archive_group(
        &self,
        caller: Option<&CurrentUser>,
        input: GroupIdInput,
    ) -> Result<Envelope<GroupData>, ActionError> {
        let user_id = authenticate(caller)?;
        validation::require_id("id", input.id)?;

        self.resolver.resolve_group(input.id, user_id).await?;
        let group = self.write_group(input.id, &GroupPatch::archive()).await?;

        info!(
            group_id = group.id,
            user_id = user_id,
            "Formula group archived"
        );
        Ok(Envelope::ok(GroupData { group }))
    }

    /// Returns a group the caller owns, or a shared one.
    #[instrument(skip(self, input), fields(group_id = input.id))]
    pub async fn get_group(
        &self,
        caller: Option<&CurrentUser>,
        input: GroupIdInput,
    ) -> Result<Envelope<GroupData>, ActionError> {
        let user_id = authenticate(caller)?;
        validation::require_id("id", input.id)?;

        let group = self.resolver.resolve_group(input.id, user_id).await?;
        Ok(Envelope::ok(GroupData { group }))
    }

    /// Lists the caller's groups. Archived groups are left out unless asked for.
    #[instrument(skip(self, input))]
    pub async fn list_my_groups(
        &self,
        caller: Option<&CurrentUser>,
        input: ListMyGroupsInput,
    ) -> Result<Envelope<GroupList>, ActionError> {
        let user_id = authenticate(caller)?;
        let groups = self
            .repos
            .groups
            .list_groups_by_owner(user_id, input.include_inactive)
            .await?;
        Ok(Envelope::ok(groups.into()))
    }

    fn validate_group_patch(&self, patch: &GroupPatch) -> Result<(), ActionError> {
        let limits = &self.config;
        validation::non_empty_patch(patch.is_empty())?;
        validation::patched_text("name", patch.name.as_deref(), limits.max_name_length)?;
        validation::optional_text("subject", patch.subject.as_deref(), limits.max_name_length)?;
        validation::tags(patch.tags.as_deref(), limits.max_name_length)?;
        validation::optional_text(
            "description",
            patch.description.as_deref(),
            limits.max_text_length,
        )?;
        validation::optional_text("slug", patch.slug.as_deref(), limits.max_name_length)
    }

    async fn write_group(
        &self,
        group_id: GroupId,
        patch: &GroupPatch,
    ) -> Result<FormulaGroup, ActionError> {
        self.repos
            .groups
            .update_group(group_id, patch, Utc::now())
            .await?
            .ok_or_else(|| ActionError::not_found(ResourceKind::FormulaGroup, group_id))
    }
}
