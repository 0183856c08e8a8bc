mod example;
mod formula;
mod group;
mod user_state;

pub use example::{FormulaExample, NewExample};
pub use formula::{Difficulty, Formula, FormulaFilter, FormulaPatch, NewFormula, Variable};
pub use group::{FormulaGroup, GroupPatch, NewGroup};
pub use user_state::{Familiarity, StateFilter, StatePatch, UserFormulaState};

/// Identifier of an authenticated user, as handed out by the session collaborator.
pub type UserId = i64;
pub type GroupId = i64;
pub type FormulaId = i64;
pub type ExampleId = i64;
pub type StateId = i64;

/// Open key-value map stored alongside formulas and examples.
pub type Meta = serde_json::Map<String, serde_json::Value>;

/// Error returned when a stored or submitted enum literal is not recognized.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} literal: {value}")]
pub struct ParseLiteralError {
    pub kind: &'static str,
    pub value: String,
}
