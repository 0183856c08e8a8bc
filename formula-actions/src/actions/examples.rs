use chrono::Utc;
use formula_shared::types::{FormulaId, Meta, NewExample};
use serde::Deserialize;
use tracing::{info, instrument};

use crate::actions::{validation, FormulaActions};
use crate::auth::{authenticate, CurrentUser};
use crate::envelope::{Envelope, ExampleData, ExampleList};
use crate::errors::ActionError;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateExampleInput {
    pub formula_id: FormulaId,
    #[serde(default)]
    pub title: Option<String>,
    pub problem: String,
    pub solution: String,
    #[serde(default)]
    pub data: Option<Meta>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListExamplesInput {
    pub formula_id: FormulaId,
}

impl FormulaActions {
    /// Attaches a worked example to a formula the caller may edit.
    #[instrument(skip(self, input), fields(formula_id = input.formula_id))]
    pub async fn create_example(
        &self,
        caller: Option<&CurrentUser>,
        input: CreateExampleInput,
    ) -> Result<Envelope<ExampleData>, ActionError> {
        let user_id = authenticate(caller)?;
        let limits = &self.config;
        validation::require_id("formulaId", input.formula_id)?;
        validation::optional_text("title", input.title.as_deref(), limits.max_name_length)?;
        validation::require_text("problem", &input.problem, limits.max_text_length)?;
        validation::require_text("solution", &input.solution, limits.max_text_length)?;

        let new_example = NewExample {
            formula_id: input.formula_id,
            title: input.title,
            problem: input.problem,
            solution: input.solution,
            data: input.data,
            created_at: Utc::now(),
        };
        self.resolver.authorize(&new_example, user_id).await?;

        let example = self.repos.examples.insert_example(new_example).await?;

        info!(
            example_id = example.id,
            formula_id = example.formula_id,
            user_id = user_id,
            "Formula example created"
        );
        Ok(Envelope::ok(ExampleData { example }))
    }

    /// Lists the examples of a formula. Examples are readable by every authenticated user,
    /// whatever group the formula belongs to. An unknown formula has no examples.
    #[instrument(skip(self, input), fields(formula_id = input.formula_id))]
    pub async fn list_examples(
        &self,
        caller: Option<&CurrentUser>,
        input: ListExamplesInput,
    ) -> Result<Envelope<ExampleList>, ActionError> {
        authenticate(caller)?;
        validation::require_id("formulaId", input.formula_id)?;

        let examples = self.repos.examples.list_examples(input.formula_id).await?;
        Ok(Envelope::ok(examples.into()))
    }
}
