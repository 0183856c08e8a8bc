use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{FormulaId, GroupId, Meta, ParseLiteralError};

/// How hard a formula is to apply.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    #[default]
    Basic,
    Intermediate,
    Advanced,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Basic => "basic",
            Difficulty::Intermediate => "intermediate",
            Difficulty::Advanced => "advanced",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = ParseLiteralError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "basic" => Ok(Difficulty::Basic),
            "intermediate" => Ok(Difficulty::Intermediate),
            "advanced" => Ok(Difficulty::Advanced),
            other => Err(ParseLiteralError {
                kind: "difficulty",
                value: other.to_string(),
            }),
        }
    }
}

/// A symbol used in a formula expression.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Variable {
    pub symbol: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meaning: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
}

/// A formula, optionally filed under a group.
///
/// Mutation rights are never stored here; they come from the owner of `group_id`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Formula {
    pub id: FormulaId,
    pub group_id: Option<GroupId>,
    pub name: String,
    pub expression: String,
    pub description: Option<String>,
    pub variables: Option<Vec<Variable>>,
    pub meta: Option<Meta>,
    pub difficulty: Difficulty,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewFormula {
    pub group_id: Option<GroupId>,
    pub name: String,
    pub expression: String,
    pub description: Option<String>,
    pub variables: Option<Vec<Variable>>,
    pub meta: Option<Meta>,
    pub difficulty: Difficulty,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// Partial update for a formula. `None` leaves the stored value unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct FormulaPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_id: Option<GroupId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expression: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variables: Option<Vec<Variable>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<Meta>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<Difficulty>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

impl FormulaPatch {
    /// Patch that archives a formula.
    pub fn archive() -> Self {
        Self {
            is_active: Some(false),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.group_id.is_none()
            && self.name.is_none()
            && self.expression.is_none()
            && self.description.is_none()
            && self.variables.is_none()
            && self.meta.is_none()
            && self.difficulty.is_none()
            && self.is_active.is_none()
    }

    /// Applies the present fields to `formula` and stamps `updated_at`.
    pub fn apply(&self, formula: &mut Formula, now: DateTime<Utc>) {
        if let Some(group_id) = self.group_id {
            formula.group_id = Some(group_id);
        }
        if let Some(name) = &self.name {
            formula.name = name.clone();
        }
        if let Some(expression) = &self.expression {
            formula.expression = expression.clone();
        }
        if let Some(description) = &self.description {
            formula.description = Some(description.clone());
        }
        if let Some(variables) = &self.variables {
            formula.variables = Some(variables.clone());
        }
        if let Some(meta) = &self.meta {
            formula.meta = Some(meta.clone());
        }
        if let Some(difficulty) = self.difficulty {
            formula.difficulty = difficulty;
        }
        if let Some(is_active) = self.is_active {
            formula.is_active = is_active;
        }
        formula.updated_at = now;
    }
}

/// Filter for the shared formula catalog.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct FormulaFilter {
    pub group_id: Option<GroupId>,
    pub difficulty: Option<Difficulty>,
    pub include_inactive: bool,
}

impl FormulaFilter {
    pub fn matches(&self, formula: &Formula) -> bool {
        if let Some(group_id) = self.group_id {
            if formula.group_id != Some(group_id) {
                return false;
            }
        }
        if let Some(difficulty) = self.difficulty {
            if formula.difficulty != difficulty {
                return false;
            }
        }
        self.include_inactive || formula.is_active
    }
}
