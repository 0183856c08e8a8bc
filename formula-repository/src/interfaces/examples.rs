use formula_shared::types::{FormulaExample, FormulaId, NewExample};

use crate::errors::RepositoryError;

/// Storage interface for worked examples.
#[async_trait::async_trait]
pub trait ExampleRepository: Send + Sync {
    async fn insert_example(&self, example: NewExample) -> Result<FormulaExample, RepositoryError>;

    /// Lists the examples of a formula in insertion order.
    async fn list_examples(
        &self,
        formula_id: FormulaId,
    ) -> Result<Vec<FormulaExample>, RepositoryError>;
}
