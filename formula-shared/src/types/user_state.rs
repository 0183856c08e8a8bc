use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{FormulaId, ParseLiteralError, StateId, UserId};

/// A user's self-reported comfort level with a formula, in increasing order.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Familiarity {
    #[default]
    New,
    Learning,
    Comfortable,
    Mastered,
}

impl Familiarity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Familiarity::New => "new",
            Familiarity::Learning => "learning",
            Familiarity::Comfortable => "comfortable",
            Familiarity::Mastered => "mastered",
        }
    }
}

impl fmt::Display for Familiarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Familiarity {
    type Err = ParseLiteralError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "new" => Ok(Familiarity::New),
            "learning" => Ok(Familiarity::Learning),
            "comfortable" => Ok(Familiarity::Comfortable),
            "mastered" => Ok(Familiarity::Mastered),
            other => Err(ParseLiteralError {
                kind: "familiarity",
                value: other.to_string(),
            }),
        }
    }
}

/// Per-user favorite and familiarity state for one formula.
///
/// At most one row exists per `(user_id, formula_id)`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserFormulaState {
    pub id: StateId,
    pub user_id: UserId,
    pub formula_id: FormulaId,
    pub is_favorite: bool,
    pub note: Option<String>,
    pub familiarity: Familiarity,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields supplied to a state upsert. Absent fields keep their stored value, or take the
/// defaults (`is_favorite = false`, `familiarity = new`) when the row is created.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct StatePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_favorite: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub familiarity: Option<Familiarity>,
}

impl StatePatch {
    /// Builds the row stored when no state exists yet for the pair.
    pub fn to_new_state(
        &self,
        id: StateId,
        user_id: UserId,
        formula_id: FormulaId,
        now: DateTime<Utc>,
    ) -> UserFormulaState {
        UserFormulaState {
            id,
            user_id,
            formula_id,
            is_favorite: self.is_favorite.unwrap_or(false),
            note: self.note.clone(),
            familiarity: self.familiarity.unwrap_or_default(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn apply(&self, state: &mut UserFormulaState, now: DateTime<Utc>) {
        if let Some(is_favorite) = self.is_favorite {
            state.is_favorite = is_favorite;
        }
        if let Some(note) = &self.note {
            state.note = Some(note.clone());
        }
        if let Some(familiarity) = self.familiarity {
            state.familiarity = familiarity;
        }
        state.updated_at = now;
    }
}

/// Filter for a user's own state rows.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct StateFilter {
    pub formula_id: Option<FormulaId>,
    pub favorites_only: bool,
}

impl StateFilter {
    pub fn matches(&self, state: &UserFormulaState) -> bool {
        if let Some(formula_id) = self.formula_id {
            if state.formula_id != formula_id {
                return false;
            }
        }
        !self.favorites_only || state.is_favorite
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_familiarity_is_ordered() {
        assert!(Familiarity::New < Familiarity::Learning);
        assert!(Familiarity::Learning < Familiarity::Comfortable);
        assert!(Familiarity::Comfortable < Familiarity::Mastered);
        assert_eq!("mastered".parse::<Familiarity>(), Ok(Familiarity::Mastered));
        assert!("expert".parse::<Familiarity>().is_err());
    }

    #[test]
    fn test_new_state_defaults() {
        let now = Utc::now();
        let state = StatePatch::default().to_new_state(1, 10, 20, now);
        assert!(!state.is_favorite);
        assert_eq!(state.familiarity, Familiarity::New);
        assert!(state.note.is_none());
        assert_eq!(state.created_at, state.updated_at);
    }

    #[test]
    fn test_apply_preserves_omitted_fields() {
        let now = Utc::now();
        let mut state = StatePatch {
            is_favorite: Some(true),
            note: Some("remember units".to_string()),
            familiarity: None,
        }
        .to_new_state(1, 10, 20, now);

        StatePatch {
            familiarity: Some(Familiarity::Learning),
            ..Default::default()
        }
        .apply(&mut state, now);

        assert!(state.is_favorite);
        assert_eq!(state.note.as_deref(), Some("remember units"));
        assert_eq!(state.familiarity, Familiarity::Learning);
    }

    #[test]
    fn test_filter_favorites_only() {
        let now = Utc::now();
        let favorite = StatePatch {
            is_favorite: Some(true),
            ..Default::default()
        }
        .to_new_state(1, 10, 20, now);
        let plain = StatePatch::default().to_new_state(2, 10, 21, now);

        let filter = StateFilter {
            favorites_only: true,
            ..Default::default()
        };
        assert!(filter.matches(&favorite));
        assert!(!filter.matches(&plain));

        let by_formula = StateFilter {
            formula_id: Some(21),
            favorites_only: false,
        };
        assert!(!by_formula.matches(&favorite));
        assert!(by_formula.matches(&plain));
    }
}
