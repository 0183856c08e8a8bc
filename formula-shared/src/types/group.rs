use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{GroupId, UserId};

/// A named collection of formulas.
///
/// A group with an `owner_id` is owner-gated: only that user may mutate it or the
/// formulas inside it. A group without an owner is shared with every authenticated user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FormulaGroup {
    pub id: GroupId,
    pub owner_id: Option<UserId>,
    pub name: String,
    pub subject: Option<String>,
    pub tags: Option<Vec<String>>,
    pub description: Option<String>,
    pub slug: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Values for a group that has not been stored yet.
///
/// `created_at` is used for both timestamps of the new row.
#[derive(Debug, Clone, PartialEq)]
pub struct NewGroup {
    pub owner_id: Option<UserId>,
    pub name: String,
    pub subject: Option<String>,
    pub tags: Option<Vec<String>>,
    pub description: Option<String>,
    pub slug: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// Partial update for a group. `None` leaves the stored value unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct GroupPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

impl GroupPatch {
    /// Patch that archives a group.
    pub fn archive() -> Self {
        Self {
            is_active: Some(false),
            ..Default::default()
        }
    }

    /// Returns true when no field is present.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.subject.is_none()
            && self.tags.is_none()
            && self.description.is_none()
            && self.slug.is_none()
            && self.is_active.is_none()
    }

    /// Applies the present fields to `group` and stamps `updated_at`.
    pub fn apply(&self, group: &mut FormulaGroup, now: DateTime<Utc>) {
        if let Some(name) = &self.name {
            group.name = name.clone();
        }
        if let Some(subject) = &self.subject {
            group.subject = Some(subject.clone());
        }
        if let Some(tags) = &self.tags {
            group.tags = Some(tags.clone());
        }
        if let Some(description) = &self.description {
            group.description = Some(description.clone());
        }
        if let Some(slug) = &self.slug {
            group.slug = Some(slug.clone());
        }
        if let Some(is_active) = self.is_active {
            group.is_active = is_active;
        }
        group.updated_at = now;
    }
}
