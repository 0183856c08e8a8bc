//! PostgreSQL implementation of the group repository.
//!
//! Partial updates are built with `sqlx::QueryBuilder`, so only the columns present in
//! the patch appear in the `SET` clause.
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use formula_shared::types::{FormulaGroup, GroupId, GroupPatch, NewGroup, UserId};
use sqlx::{Postgres, QueryBuilder};

use super::rows::{GroupRow, GROUP_COLUMNS};
use crate::{GroupRepository, RepositoryError};

/// PostgreSQL-backed group repository.
pub struct PostgresGroupRepository {
    pool: sqlx::PgPool,
}

impl PostgresGroupRepository {
    /// Creates a new repository over a pool whose schema includes `formula_groups`.
    pub fn new(pool: sqlx::PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl GroupRepository for PostgresGroupRepository {
    async fn insert_group(&self, group: NewGroup) -> Result<FormulaGroup, RepositoryError> {
        let sql = format!(
            r#"
            INSERT INTO formula_groups (owner_id, name, subject, tags, description, slug, is_active, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $8)
            RETURNING {GROUP_COLUMNS}
            "#
        );
        let row = sqlx::query_as::<_, GroupRow>(&sql)
            .bind(group.owner_id)
            .bind(&group.name)
            .bind(&group.subject)
            .bind(&group.tags)
            .bind(&group.description)
            .bind(&group.slug)
            .bind(group.is_active)
            .bind(group.created_at)
            .fetch_one(&self.pool)
            .await?;

        Ok(row.into())
    }

    async fn get_group(&self, id: GroupId) -> Result<Option<FormulaGroup>, RepositoryError> {
        let sql = format!("SELECT {GROUP_COLUMNS} FROM formula_groups WHERE id = $1");
        let row = sqlx::query_as::<_, GroupRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(FormulaGroup::from))
    }

    async fn update_group(
        &self,
        id: GroupId,
        patch: &GroupPatch,
        now: DateTime<Utc>,
    ) -> Result<Option<FormulaGroup>, RepositoryError> {
        let mut builder = QueryBuilder::<Postgres>::new("UPDATE formula_groups SET updated_at = ");
        builder.push_bind(now);

        if let Some(name) = &patch.name {
            builder.push(", name = ").push_bind(name.clone());
        }
        if let Some(subject) = &patch.subject {
            builder.push(", subject = ").push_bind(subject.clone());
        }
        if let Some(tags) = &patch.tags {
            builder.push(", tags = ").push_bind(tags.clone());
        }
        if let Some(description) = &patch.description {
            builder
                .push(", description = ")
                .push_bind(description.clone());
        }
        if let Some(slug) = &patch.slug {
            builder.push(", slug = ").push_bind(slug.clone());
        }
        if let Some(is_active) = patch.is_active {
            builder.push(", is_active = ").push_bind(is_active);
        }

        builder.push(" WHERE id = ").push_bind(id);
        builder.push(" RETURNING ").push(GROUP_COLUMNS);

        let row = builder
            .build_query_as::<GroupRow>()
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(FormulaGroup::from))
    }

    async fn list_groups_by_owner(
        &self,
        owner_id: UserId,
        include_inactive: bool,
    ) -> Result<Vec<FormulaGroup>, RepositoryError> {
        let mut builder = QueryBuilder::<Postgres>::new(format!(
            "SELECT {GROUP_COLUMNS} FROM formula_groups WHERE owner_id = "
        ));
        builder.push_bind(owner_id);
        if !include_inactive {
            builder.push(" AND is_active = TRUE");
        }
        builder.push(" ORDER BY id DESC");

        let rows = builder
            .build_query_as::<GroupRow>()
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(FormulaGroup::from).collect())
    }
}
