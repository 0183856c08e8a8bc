use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{ExampleId, FormulaId, Meta};

/// A worked example attached to a formula.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FormulaExample {
    pub id: ExampleId,
    pub formula_id: FormulaId,
    pub title: Option<String>,
    pub problem: String,
    pub solution: String,
    pub data: Option<Meta>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewExample {
    pub formula_id: FormulaId,
    pub title: Option<String>,
    pub problem: String,
    pub solution: String,
    pub data: Option<Meta>,
    pub created_at: DateTime<Utc>,
}
