//! Response envelope and payload shapes returned by the actions.
use formula_shared::types::{Formula, FormulaExample, FormulaGroup, UserFormulaState};
use serde::Serialize;

/// Uniform success shape: `{ "success": true, "data": ... }`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Envelope<T> {
    pub success: bool,
    pub data: T,
}

impl<T> Envelope<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupData {
    pub group: FormulaGroup,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupList {
    pub groups: Vec<FormulaGroup>,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormulaData {
    pub formula: Formula,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormulaList {
    pub formulas: Vec<Formula>,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExampleData {
    pub example: FormulaExample,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExampleList {
    pub examples: Vec<FormulaExample>,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StateData {
    pub state: UserFormulaState,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StateList {
    pub states: Vec<UserFormulaState>,
    pub count: usize,
}

impl From<Vec<FormulaGroup>> for GroupList {
    fn from(groups: Vec<FormulaGroup>) -> Self {
        Self {
            count: groups.len(),
            groups,
        }
    }
}

impl From<Vec<Formula>> for FormulaList {
    fn from(formulas: Vec<Formula>) -> Self {
        Self {
            count: formulas.len(),
            formulas,
        }
    }
}

impl From<Vec<FormulaExample>> for ExampleList {
    fn from(examples: Vec<FormulaExample>) -> Self {
        Self {
            count: examples.len(),
            examples,
        }
    }
}

impl From<Vec<UserFormulaState>> for StateList {
    fn from(states: Vec<UserFormulaState>) -> Self {
        Self {
            count: states.len(),
            states,
        }
    }
}
