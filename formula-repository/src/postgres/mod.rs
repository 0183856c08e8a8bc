//! PostgreSQL implementation of the formula repository.
//!
//! ## Database Tables
//!
//! - `formula_groups`: groups with an optional owner
//! - `formulas`: formulas, optionally filed under a group
//! - `formula_examples`: worked examples per formula
//! - `user_formula_states`: per-user state, unique on `(user_id, formula_id)`
//!
//! The schema lives in `src/postgres/migrations`.
mod examples_repository;
mod formulas_repository;
mod groups_repository;
mod rows;
mod user_state_repository;

pub use examples_repository::PostgresExampleRepository;
pub use formulas_repository::PostgresFormulaRepository;
pub use groups_repository::PostgresGroupRepository;
pub use user_state_repository::PostgresUserStateRepository;

use crate::errors::RepositoryError;

/// Tables the repositories expect to find.
pub const TABLES: [&str; 4] = [
    "formula_groups",
    "formulas",
    "formula_examples",
    "user_formula_states",
];

/// Checks if the tables are created in the database.
///
/// # Returns
///
/// * `Ok(true)` - Every table in [`TABLES`] exists
/// * `Ok(false)` - At least one table is missing
/// * `Err(RepositoryError)` - Database query failure
pub async fn check_tables_created(pool: &sqlx::PgPool) -> Result<bool, RepositoryError> {
    for table in TABLES {
        let table_exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM information_schema.tables WHERE table_name = $1)",
        )
        .bind(table)
        .fetch_one(pool)
        .await?;
        if !table_exists {
            tracing::warn!(table = table, "Expected table is missing");
            return Ok(false);
        }
    }
    Ok(true)
}
