use async_trait::async_trait;
use formula_shared::types::{FormulaExample, FormulaId, NewExample};
use sqlx::types::Json;

use super::rows::{ExampleRow, EXAMPLE_COLUMNS};
use crate::{ExampleRepository, RepositoryError};

pub struct PostgresExampleRepository {
    pool: sqlx::PgPool,
}

impl PostgresExampleRepository {
    pub fn new(pool: sqlx::PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ExampleRepository for PostgresExampleRepository {
    async fn insert_example(&self, example: NewExample) -> Result<FormulaExample, RepositoryError> {
        let sql = format!(
            r#"
            INSERT INTO formula_examples (formula_id, title, problem, solution, data, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {EXAMPLE_COLUMNS}
            "#
        );
        let row = sqlx::query_as::<_, ExampleRow>(&sql)
            .bind(example.formula_id)
            .bind(&example.title)
            .bind(&example.problem)
            .bind(&example.solution)
            .bind(example.data.map(Json))
            .bind(example.created_at)
            .fetch_one(&self.pool)
            .await?;

        Ok(row.into())
    }

    async fn list_examples(
        &self,
        formula_id: FormulaId,
    ) -> Result<Vec<FormulaExample>, RepositoryError> {
        let sql = format!(
            "SELECT {EXAMPLE_COLUMNS} FROM formula_examples WHERE formula_id = $1 ORDER BY id"
        );
        let rows = sqlx::query_as::<_, ExampleRow>(&sql)
            .bind(formula_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(FormulaExample::from).collect())
    }
}
