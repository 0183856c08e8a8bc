use chrono::Utc;
use formula_shared::types::{
    Difficulty, Formula, FormulaFilter, FormulaId, FormulaPatch, GroupId, Meta, NewFormula,
    Variable,
};
use serde::Deserialize;
use tracing::{debug, info, instrument};

use crate::actions::{validation, FormulaActions};
use crate::auth::{authenticate, CurrentUser};
use crate::envelope::{Envelope, FormulaData, FormulaList};
use crate::errors::{ActionError, ResourceKind};
use crate::ownership::Access;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateFormulaInput {
    #[serde(default)]
    pub group_id: Option<GroupId>,
    pub name: String,
    pub expression: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub variables: Option<Vec<Variable>>,
    #[serde(default)]
    pub meta: Option<Meta>,
    #[serde(default)]
    pub difficulty: Option<Difficulty>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateFormulaInput {
    pub id: FormulaId,
    #[serde(flatten)]
    pub patch: FormulaPatch,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct FormulaIdInput {
    pub id: FormulaId,
}

impl FormulaActions {
    /// Creates a formula, optionally filed under a group the caller may use.
    ///
    /// The group check runs before the insert, so a rejected request stores nothing.
    #[instrument(skip(self, input), fields(group_id = ?input.group_id))]
    pub async fn create_formula(
        &self,
        caller: Option<&CurrentUser>,
        input: CreateFormulaInput,
    ) -> Result<Envelope<FormulaData>, ActionError> {
        let user_id = authenticate(caller)?;
        let limits = &self.config;
        validation::optional_id("groupId", input.group_id)?;
        validation::require_text("name", &input.name, limits.max_name_length)?;
        validation::require_text("expression", &input.expression, limits.max_text_length)?;
        validation::optional_text(
            "description",
            input.description.as_deref(),
            limits.max_text_length,
        )?;
        validation::variables(input.variables.as_deref(), limits.max_name_length)?;

        self.resolver
            .check(Access::Group(input.group_id), user_id)
            .await?;

        let formula = self
            .repos
            .formulas
            .insert_formula(NewFormula {
                group_id: input.group_id,
                name: input.name,
                expression: input.expression,
                description: input.description,
                variables: input.variables,
                meta: input.meta,
                difficulty: input.difficulty.unwrap_or_default(),
                is_active: true,
                created_at: Utc::now(),
            })
            .await?;

        info!(
            formula_id = formula.id,
            group_id = ?formula.group_id,
            user_id = user_id,
            "Formula created"
        );
        Ok(Envelope::ok(FormulaData { formula }))
    }

    /// Applies a partial update to a formula.
    ///
    /// Edit rights are checked on the formula's current group first. When the patch
    /// moves the formula, rights on the destination group are checked as well.
    #[instrument(skip(self, input), fields(formula_id = input.id))]
    pub async fn update_formula(
        &self,
        caller: Option<&CurrentUser>,
        input: UpdateFormulaInput,
    ) -> Result<Envelope<FormulaData>, ActionError> {
        let user_id = authenticate(caller)?;
        validation::require_id("id", input.id)?;
        self.validate_formula_patch(&input.patch)?;

        let current = self.resolver.resolve_formula(input.id, user_id).await?;
        if input.patch.group_id.is_some() && input.patch.group_id != current.group_id {
            debug!(
                formula_id = current.id,
                from = ?current.group_id,
                to = ?input.patch.group_id,
                "Checking destination group"
            );
            self.resolver
                .check(Access::Group(input.patch.group_id), user_id)
                .await?;
        }

        let formula = self.write_formula(input.id, &input.patch).await?;

        info!(
            formula_id = formula.id,
            user_id = user_id,
            "Formula updated"
        );
        Ok(Envelope::ok(FormulaData { formula }))
    }

    /// Marks a formula inactive. The row is kept.
    #[instrument(skip(self, input), fields(formula_id = input.id))]
    pub async fn archive_formula(
        &self,
        caller: Option<&CurrentUser>,
        input: FormulaIdInput,
    ) -> Result<Envelope<FormulaData>, ActionError> {
        let user_id = authenticate(caller)?;
        validation::require_id("id", input.id)?;

        self.resolver.resolve_formula(input.id, user_id).await?;
        let archive = FormulaPatch::archive();
        let formula = self.write_formula(input.id, &archive).await?;

        info!(
            formula_id = formula.id,
            user_id = user_id,
            "Formula archived"
        );
        Ok(Envelope::ok(FormulaData { formula }))
    }

    /// Reads a formula by id. Formulas are readable by every authenticated user.
    #[instrument(skip(self, input), fields(formula_id = input.id))]
    pub async fn get_formula(
        &self,
        caller: Option<&CurrentUser>,
        input: FormulaIdInput,
    ) -> Result<Envelope<FormulaData>, ActionError> {
        authenticate(caller)?;
        validation::require_id("id", input.id)?;

        let formula = self
            .repos
            .formulas
            .get_formula(input.id)
            .await?
            .ok_or_else(|| ActionError::not_found(ResourceKind::Formula, input.id))?;
        Ok(Envelope::ok(FormulaData { formula }))
    }

    /// Lists the shared formula catalog. No owner scoping is applied.
    #[instrument(skip(self, filter))]
    pub async fn list_formulas(
        &self,
        caller: Option<&CurrentUser>,
        filter: FormulaFilter,
    ) -> Result<Envelope<FormulaList>, ActionError> {
        authenticate(caller)?;
        validation::optional_id("groupId", filter.group_id)?;

        let formulas = self.repos.formulas.list_formulas(&filter).await?;
        debug!(count = formulas.len(), "Listed formulas");
        Ok(Envelope::ok(formulas.into()))
    }

    fn validate_formula_patch(&self, patch: &FormulaPatch) -> Result<(), ActionError> {
        let limits = &self.config;
        validation::non_empty_patch(patch.is_empty())?;
        validation::optional_id("groupId", patch.group_id)?;
        validation::patched_text("name", patch.name.as_deref(), limits.max_name_length)?;
        validation::patched_text(
            "expression",
            patch.expression.as_deref(),
            limits.max_text_length,
        )?;
        validation::optional_text(
            "description",
            patch.description.as_deref(),
            limits.max_text_length,
        )?;
        validation::variables(patch.variables.as_deref(), limits.max_name_length)
    }

    async fn write_formula(
        &self,
        formula_id: FormulaId,
        patch: &FormulaPatch,
    ) -> Result<Formula, ActionError> {
        self.repos
            .formulas
            .update_formula(formula_id, patch, Utc::now())
            .await?
            .ok_or_else(|| ActionError::not_found(ResourceKind::Formula, formula_id))
    }
}
