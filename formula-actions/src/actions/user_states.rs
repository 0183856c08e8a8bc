use chrono::Utc;
use formula_shared::types::{FormulaId, StateFilter, StatePatch};
use serde::Deserialize;
use tracing::{info, instrument};

use crate::actions::{validation, FormulaActions};
use crate::auth::{authenticate, CurrentUser};
use crate::envelope::{Envelope, StateData, StateList};
use crate::errors::{ActionError, ResourceKind};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpsertStateInput {
    pub formula_id: FormulaId,
    #[serde(flatten)]
    pub patch: StatePatch,
}

impl FormulaActions {
    /// Records the caller's favorite flag, note or familiarity for a formula.
    ///
    /// Only the supplied fields are written. The first call for a formula creates the
    /// row with `isFavorite = false` and `familiarity = new` for anything left out.
    #[instrument(skip(self, input), fields(formula_id = input.formula_id))]
    pub async fn upsert_state(
        &self,
        caller: Option<&CurrentUser>,
        input: UpsertStateInput,
    ) -> Result<Envelope<StateData>, ActionError> {
        let user_id = authenticate(caller)?;
        validation::require_id("formulaId", input.formula_id)?;
        validation::optional_text(
            "note",
            input.patch.note.as_deref(),
            self.config.max_text_length,
        )?;

        if self
            .repos
            .formulas
            .get_formula(input.formula_id)
            .await?
            .is_none()
        {
            return Err(ActionError::not_found(ResourceKind::Formula, input.formula_id));
        }

        let state = self
            .repos
            .states
            .upsert_state(user_id, input.formula_id, &input.patch, Utc::now())
            .await?;

        info!(
            state_id = state.id,
            formula_id = state.formula_id,
            user_id = user_id,
            familiarity = %state.familiarity,
            "User formula state saved"
        );
        Ok(Envelope::ok(StateData { state }))
    }

    /// Lists the caller's own state rows.
    #[instrument(skip(self, filter))]
    pub async fn list_my_states(
        &self,
        caller: Option<&CurrentUser>,
        filter: StateFilter,
    ) -> Result<Envelope<StateList>, ActionError> {
        let user_id = authenticate(caller)?;
        validation::optional_id("formulaId", filter.formula_id)?;

        let states = self.repos.states.list_states(user_id, &filter).await?;
        Ok(Envelope::ok(states.into()))
    }
}
