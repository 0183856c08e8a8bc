//! PostgreSQL implementation of the user state repository.
//!
//! The upsert is a single `INSERT ... ON CONFLICT DO UPDATE` keyed by the
//! `(user_id, formula_id)` unique constraint, so concurrent calls for the same pair
//! converge on one row.
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use formula_shared::types::{FormulaId, StateFilter, StatePatch, UserFormulaState, UserId};
use sqlx::{Postgres, QueryBuilder};

use super::rows::{StateRow, STATE_COLUMNS};
use crate::{RepositoryError, UserStateRepository};

pub struct PostgresUserStateRepository {
    pool: sqlx::PgPool,
}

impl PostgresUserStateRepository {
    pub fn new(pool: sqlx::PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStateRepository for PostgresUserStateRepository {
    async fn upsert_state(
        &self,
        user_id: UserId,
        formula_id: FormulaId,
        patch: &StatePatch,
        now: DateTime<Utc>,
    ) -> Result<UserFormulaState, RepositoryError> {
        // NULL parameters fall back to the insert defaults or the stored values.
        let sql = format!(
            r#"
            INSERT INTO user_formula_states (user_id, formula_id, is_favorite, note, familiarity, created_at, updated_at)
            VALUES ($1, $2, COALESCE($3, FALSE), $4, COALESCE($5, 'new'), $6, $6)
            ON CONFLICT (user_id, formula_id)
            DO UPDATE SET
                is_favorite = COALESCE($3, user_formula_states.is_favorite),
                note = COALESCE($4, user_formula_states.note),
                familiarity = COALESCE($5, user_formula_states.familiarity),
                updated_at = $6
            RETURNING {STATE_COLUMNS}
            "#
        );
        let row = sqlx::query_as::<_, StateRow>(&sql)
            .bind(user_id)
            .bind(formula_id)
            .bind(patch.is_favorite)
            .bind(&patch.note)
            .bind(patch.familiarity.map(|familiarity| familiarity.as_str()))
            .bind(now)
            .fetch_one(&self.pool)
            .await?;

        row.try_into()
    }

    async fn list_states(
        &self,
        user_id: UserId,
        filter: &StateFilter,
    ) -> Result<Vec<UserFormulaState>, RepositoryError> {
        let mut builder = QueryBuilder::<Postgres>::new(format!(
            "SELECT {STATE_COLUMNS} FROM user_formula_states WHERE user_id = "
        ));
        builder.push_bind(user_id);
        if let Some(formula_id) = filter.formula_id {
            builder.push(" AND formula_id = ").push_bind(formula_id);
        }
        if filter.favorites_only {
            builder.push(" AND is_favorite = TRUE");
        }
        builder.push(" ORDER BY id");

        let rows = builder
            .build_query_as::<StateRow>()
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(UserFormulaState::try_from).collect()
    }
}
