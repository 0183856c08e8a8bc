use chrono::{DateTime, Utc};
use formula_shared::types::{Formula, FormulaFilter, FormulaId, FormulaPatch, NewFormula};

use crate::errors::RepositoryError;

/// Storage interface for formulas.
#[async_trait::async_trait]
pub trait FormulaRepository: Send + Sync {
    async fn insert_formula(&self, formula: NewFormula) -> Result<Formula, RepositoryError>;

    async fn get_formula(&self, id: FormulaId) -> Result<Option<Formula>, RepositoryError>;

    /// Applies the fields present in `patch` and stamps `updated_at` with `now`.
    /// Returns `Ok(None)` when the formula does not exist.
    async fn update_formula(
        &self,
        id: FormulaId,
        patch: &FormulaPatch,
        now: DateTime<Utc>,
    ) -> Result<Option<Formula>, RepositoryError>;

    /// Lists formulas matching `filter`, newest first. No owner scoping is applied.
    async fn list_formulas(&self, filter: &FormulaFilter) -> Result<Vec<Formula>, RepositoryError>;
}
