//! Named-procedure dispatch.
//!
//! Maps a procedure name such as `formulaGroup.create` and a JSON input onto the
//! typed handler, and renders the envelope back to JSON for the transport.
use std::fmt;
use std::str::FromStr;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::actions::FormulaActions;
use crate::auth::{authenticate, CurrentUser};
use crate::envelope::Envelope;
use crate::errors::ActionError;

/// Every procedure the actions expose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Procedure {
    GroupCreate,
    GroupUpdate,
    GroupArchive,
    GroupGet,
    GroupListMine,
    FormulaCreate,
    FormulaUpdate,
    FormulaArchive,
    FormulaGet,
    FormulaList,
    ExampleCreate,
    ExampleList,
    StateUpsert,
    StateListMine,
}

impl Procedure {
    pub const ALL: [Procedure; 14] = [
        Procedure::GroupCreate,
        Procedure::GroupUpdate,
        Procedure::GroupArchive,
        Procedure::GroupGet,
        Procedure::GroupListMine,
        Procedure::FormulaCreate,
        Procedure::FormulaUpdate,
        Procedure::FormulaArchive,
        Procedure::FormulaGet,
        Procedure::FormulaList,
        Procedure::ExampleCreate,
        Procedure::ExampleList,
        Procedure::StateUpsert,
        Procedure::StateListMine,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Procedure::GroupCreate => "formulaGroup.create",
            Procedure::GroupUpdate => "formulaGroup.update",
            Procedure::GroupArchive => "formulaGroup.archive",
            Procedure::GroupGet => "formulaGroup.get",
            Procedure::GroupListMine => "formulaGroup.listMine",
            Procedure::FormulaCreate => "formula.create",
            Procedure::FormulaUpdate => "formula.update",
            Procedure::FormulaArchive => "formula.archive",
            Procedure::FormulaGet => "formula.get",
            Procedure::FormulaList => "formula.list",
            Procedure::ExampleCreate => "formulaExample.create",
            Procedure::ExampleList => "formulaExample.list",
            Procedure::StateUpsert => "userFormulaState.upsert",
            Procedure::StateListMine => "userFormulaState.listMine",
        }
    }
}

impl fmt::Display for Procedure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Procedure {
    type Err = ActionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Procedure::ALL
            .into_iter()
            .find(|procedure| procedure.as_str() == s)
            .ok_or_else(|| ActionError::UnknownProcedure(s.to_string()))
    }
}

/// Parses a procedure input. A missing (`null`) input is read as `{}`.
fn parse<T: DeserializeOwned>(input: Value) -> Result<T, ActionError> {
    let input = match input {
        Value::Null => Value::Object(Default::default()),
        other => other,
    };
    serde_json::from_value(input).map_err(|e| ActionError::validation(e.to_string()))
}

fn render<T: Serialize>(envelope: Envelope<T>) -> Result<Value, ActionError> {
    serde_json::to_value(envelope).map_err(|e| ActionError::Encoding(e.to_string()))
}

impl FormulaActions {
    /// Runs the procedure called `procedure` with a JSON `input`.
    ///
    /// # Arguments
    ///
    /// * `procedure` - Procedure name, e.g. `formula.update`
    /// * `caller` - The authenticated user, if any
    /// * `input` - The procedure input as JSON
    ///
    /// # Returns
    ///
    /// * `Ok(Value)` - The `{ success: true, data }` envelope
    /// * `Err(ActionError)` - Missing user, unknown procedure, invalid input, or a handler failure
    pub async fn dispatch(
        &self,
        procedure: &str,
        caller: Option<&CurrentUser>,
        input: Value,
    ) -> Result<Value, ActionError> {
        authenticate(caller)?;
        let procedure: Procedure = procedure.parse()?;
        debug!(procedure = %procedure, "Dispatching procedure");

        match procedure {
            Procedure::GroupCreate => render(self.create_group(caller, parse(input)?).await?),
            Procedure::GroupUpdate => render(self.update_group(caller, parse(input)?).await?),
            Procedure::GroupArchive => render(self.archive_group(caller, parse(input)?).await?),
            Procedure::GroupGet => render(self.get_group(caller, parse(input)?).await?),
            Procedure::GroupListMine => render(self.list_my_groups(caller, parse(input)?).await?),
            Procedure::FormulaCreate => render(self.create_formula(caller, parse(input)?).await?),
            Procedure::FormulaUpdate => render(self.update_formula(caller, parse(input)?).await?),
            Procedure::FormulaArchive => {
                render(self.archive_formula(caller, parse(input)?).await?)
            }
            Procedure::FormulaGet => render(self.get_formula(caller, parse(input)?).await?),
            Procedure::FormulaList => render(self.list_formulas(caller, parse(input)?).await?),
            Procedure::ExampleCreate => render(self.create_example(caller, parse(input)?).await?),
            Procedure::ExampleList => render(self.list_examples(caller, parse(input)?).await?),
            Procedure::StateUpsert => render(self.upsert_state(caller, parse(input)?).await?),
            Procedure::StateListMine => render(self.list_my_states(caller, parse(input)?).await?),
        }
    }
}
