use async_trait::async_trait;
use chrono::{DateTime, Utc};
use formula_shared::types::{Formula, FormulaFilter, FormulaId, FormulaPatch, NewFormula};
use sqlx::types::Json;
use sqlx::{Postgres, QueryBuilder};

use super::rows::{FormulaRow, FORMULA_COLUMNS};
use crate::{FormulaRepository, RepositoryError};

/// PostgreSQL-backed formula repository.
///
/// `variables` and `meta` are stored as JSONB, `difficulty` as its lowercase literal.
pub struct PostgresFormulaRepository {
    pool: sqlx::PgPool,
}

impl PostgresFormulaRepository {
    pub fn new(pool: sqlx::PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FormulaRepository for PostgresFormulaRepository {
    async fn insert_formula(&self, formula: NewFormula) -> Result<Formula, RepositoryError> {
        let sql = format!(
            r#"
            INSERT INTO formulas (group_id, name, expression, description, variables, meta, difficulty, is_active, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $9)
            RETURNING {FORMULA_COLUMNS}
            "#
        );
        let row = sqlx::query_as::<_, FormulaRow>(&sql)
            .bind(formula.group_id)
            .bind(&formula.name)
            .bind(&formula.expression)
            .bind(&formula.description)
            .bind(formula.variables.map(Json))
            .bind(formula.meta.map(Json))
            .bind(formula.difficulty.as_str())
            .bind(formula.is_active)
            .bind(formula.created_at)
            .fetch_one(&self.pool)
            .await?;

        row.try_into()
    }

    async fn get_formula(&self, id: FormulaId) -> Result<Option<Formula>, RepositoryError> {
        let sql = format!("SELECT {FORMULA_COLUMNS} FROM formulas WHERE id = $1");
        let row = sqlx::query_as::<_, FormulaRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(Formula::try_from).transpose()
    }

    async fn update_formula(
        &self,
        id: FormulaId,
        patch: &FormulaPatch,
        now: DateTime<Utc>,
    ) -> Result<Option<Formula>, RepositoryError> {
        let mut builder = QueryBuilder::<Postgres>::new("UPDATE formulas SET updated_at = ");
        builder.push_bind(now);

        if let Some(group_id) = patch.group_id {
            builder.push(", group_id = ").push_bind(group_id);
        }
        if let Some(name) = &patch.name {
            builder.push(", name = ").push_bind(name.clone());
        }
        if let Some(expression) = &patch.expression {
            builder
                .push(", expression = ")
                .push_bind(expression.clone());
        }
        if let Some(description) = &patch.description {
            builder
                .push(", description = ")
                .push_bind(description.clone());
        }
        if let Some(variables) = &patch.variables {
            builder
                .push(", variables = ")
                .push_bind(Json(variables.clone()));
        }
        if let Some(meta) = &patch.meta {
            builder.push(", meta = ").push_bind(Json(meta.clone()));
        }
        if let Some(difficulty) = patch.difficulty {
            builder
                .push(", difficulty = ")
                .push_bind(difficulty.as_str());
        }
        if let Some(is_active) = patch.is_active {
            builder.push(", is_active = ").push_bind(is_active);
        }

        builder.push(" WHERE id = ").push_bind(id);
        builder.push(" RETURNING ").push(FORMULA_COLUMNS);

        let row = builder
            .build_query_as::<FormulaRow>()
            .fetch_optional(&self.pool)
            .await?;

        row.map(Formula::try_from).transpose()
    }

    async fn list_formulas(&self, filter: &FormulaFilter) -> Result<Vec<Formula>, RepositoryError> {
        let mut builder = QueryBuilder::<Postgres>::new(format!(
            "SELECT {FORMULA_COLUMNS} FROM formulas WHERE TRUE"
        ));
        if let Some(group_id) = filter.group_id {
            builder.push(" AND group_id = ").push_bind(group_id);
        }
        if let Some(difficulty) = filter.difficulty {
            builder
                .push(" AND difficulty = ")
                .push_bind(difficulty.as_str());
        }
        if !filter.include_inactive {
            builder.push(" AND is_active = TRUE");
        }
        builder.push(" ORDER BY id DESC");

        let rows = builder
            .build_query_as::<FormulaRow>()
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(Formula::try_from).collect()
    }
}
