//! In-memory formula store for testing and local development.
//!
//! `MemoryStore` implements every repository trait over a single set of tables
//! guarded by one mutex, so each operation (including the state upsert) is atomic.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use formula_repository::{GroupRepository, MemoryStore};
//! use formula_shared::types::NewGroup;
//!
//! # async fn example() -> Result<(), formula_repository::RepositoryError> {
//! let store = Arc::new(MemoryStore::new());
//! let group = store
//!     .insert_group(NewGroup {
//!         owner_id: None,
//!         name: "Shared constants".to_string(),
//!         subject: None,
//!         tags: None,
//!         description: None,
//!         slug: None,
//!         is_active: true,
//!         created_at: chrono::Utc::now(),
//!     })
//!     .await?;
//! assert_eq!(group.id, 1);
//! # Ok(())
//! # }
//! ```
use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use formula_shared::types::{
    ExampleId, Formula, FormulaExample, FormulaFilter, FormulaGroup, FormulaId, FormulaPatch,
    GroupId, GroupPatch, NewExample, NewFormula, NewGroup, StateFilter, StateId, StatePatch,
    UserFormulaState, UserId,
};
use tokio::sync::Mutex;

use crate::{
    ExampleRepository, FormulaRepository, GroupRepository, RepositoryError, UserStateRepository,
};

#[derive(Default)]
struct Tables {
    groups: BTreeMap<GroupId, FormulaGroup>,
    formulas: BTreeMap<FormulaId, Formula>,
    examples: BTreeMap<ExampleId, FormulaExample>,
    states: BTreeMap<StateId, UserFormulaState>,
    last_group_id: GroupId,
    last_formula_id: FormulaId,
    last_example_id: ExampleId,
    last_state_id: StateId,
}

/// Store that keeps every table in process memory. Ids start at 1 per table.
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of state rows stored for a `(user_id, formula_id)` pair.
    pub async fn state_rows_for(&self, user_id: UserId, formula_id: FormulaId) -> usize {
        self.tables
            .lock()
            .await
            .states
            .values()
            .filter(|state| state.user_id == user_id && state.formula_id == formula_id)
            .count()
    }
}

#[async_trait]
impl GroupRepository for MemoryStore {
    async fn insert_group(&self, group: NewGroup) -> Result<FormulaGroup, RepositoryError> {
        let mut tables = self.tables.lock().await;
        tables.last_group_id += 1;
        let stored = FormulaGroup {
            id: tables.last_group_id,
            owner_id: group.owner_id,
            name: group.name,
            subject: group.subject,
            tags: group.tags,
            description: group.description,
            slug: group.slug,
            is_active: group.is_active,
            created_at: group.created_at,
            updated_at: group.created_at,
        };
        tables.groups.insert(stored.id, stored.clone());
        Ok(stored)
    }

    async fn get_group(&self, id: GroupId) -> Result<Option<FormulaGroup>, RepositoryError> {
        Ok(self.tables.lock().await.groups.get(&id).cloned())
    }

    async fn update_group(
        &self,
        id: GroupId,
        patch: &GroupPatch,
        now: DateTime<Utc>,
    ) -> Result<Option<FormulaGroup>, RepositoryError> {
        let mut tables = self.tables.lock().await;
        Ok(tables.groups.get_mut(&id).map(|group| {
            patch.apply(group, now);
            group.clone()
        }))
    }

    async fn list_groups_by_owner(
        &self,
        owner_id: UserId,
        include_inactive: bool,
    ) -> Result<Vec<FormulaGroup>, RepositoryError> {
        let tables = self.tables.lock().await;
        Ok(tables
            .groups
            .values()
            .rev()
            .filter(|group| group.owner_id == Some(owner_id))
            .filter(|group| include_inactive || group.is_active)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl FormulaRepository for MemoryStore {
    async fn insert_formula(&self, formula: NewFormula) -> Result<Formula, RepositoryError> {
        let mut tables = self.tables.lock().await;
        tables.last_formula_id += 1;
        let stored = Formula {
            id: tables.last_formula_id,
            group_id: formula.group_id,
            name: formula.name,
            expression: formula.expression,
            description: formula.description,
            variables: formula.variables,
            meta: formula.meta,
            difficulty: formula.difficulty,
            is_active: formula.is_active,
            created_at: formula.created_at,
            updated_at: formula.created_at,
        };
        tables.formulas.insert(stored.id, stored.clone());
        Ok(stored)
    }

    async fn get_formula(&self, id: FormulaId) -> Result<Option<Formula>, RepositoryError> {
        Ok(self.tables.lock().await.formulas.get(&id).cloned())
    }

    async fn update_formula(
        &self,
        id: FormulaId,
        patch: &FormulaPatch,
        now: DateTime<Utc>,
    ) -> Result<Option<Formula>, RepositoryError> {
        let mut tables = self.tables.lock().await;
        Ok(tables.formulas.get_mut(&id).map(|formula| {
            patch.apply(formula, now);
            formula.clone()
        }))
    }

    async fn list_formulas(&self, filter: &FormulaFilter) -> Result<Vec<Formula>, RepositoryError> {
        let tables = self.tables.lock().await;
        Ok(tables
            .formulas
            .values()
            .rev()
            .filter(|formula| filter.matches(formula))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl ExampleRepository for MemoryStore {
    async fn insert_example(&self, example: NewExample) -> Result<FormulaExample, RepositoryError> {
        let mut tables = self.tables.lock().await;
        tables.last_example_id += 1;
        let stored = FormulaExample {
            id: tables.last_example_id,
            formula_id: example.formula_id,
            title: example.title,
            problem: example.problem,
            solution: example.solution,
            data: example.data,
            created_at: example.created_at,
        };
        tables.examples.insert(stored.id, stored.clone());
        Ok(stored)
    }

    async fn list_examples(
        &self,
        formula_id: FormulaId,
    ) -> Result<Vec<FormulaExample>, RepositoryError> {
        let tables = self.tables.lock().await;
        Ok(tables
            .examples
            .values()
            .filter(|example| example.formula_id == formula_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl UserStateRepository for MemoryStore {
    async fn upsert_state(
        &self,
        user_id: UserId,
        formula_id: FormulaId,
        patch: &StatePatch,
        now: DateTime<Utc>,
    ) -> Result<UserFormulaState, RepositoryError> {
        let mut tables = self.tables.lock().await;
        let existing = tables
            .states
            .values_mut()
            .find(|state| state.user_id == user_id && state.formula_id == formula_id);

        if let Some(state) = existing {
            patch.apply(state, now);
            return Ok(state.clone());
        }

        tables.last_state_id += 1;
        let stored = patch.to_new_state(tables.last_state_id, user_id, formula_id, now);
        tables.states.insert(stored.id, stored.clone());
        Ok(stored)
    }

    async fn list_states(
        &self,
        user_id: UserId,
        filter: &StateFilter,
    ) -> Result<Vec<UserFormulaState>, RepositoryError> {
        let tables = self.tables.lock().await;
        Ok(tables
            .states
            .values()
            .filter(|state| state.user_id == user_id && filter.matches(state))
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use formula_shared::types::{Difficulty, Familiarity};

    use super::*;

    fn new_group(owner_id: Option<UserId>, name: &str) -> NewGroup {
        NewGroup {
            owner_id,
            name: name.to_string(),
            subject: None,
            tags: None,
            description: Some("initial".to_string()),
            slug: None,
            is_active: true,
            created_at: Utc::now(),
        }
    }

    fn new_formula(group_id: Option<GroupId>, difficulty: Difficulty) -> NewFormula {
        NewFormula {
            group_id,
            name: "Velocity".to_string(),
            expression: "v = u + at".to_string(),
            description: None,
            variables: None,
            meta: None,
            difficulty,
            is_active: true,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_insert_and_get_group() {
        let store = MemoryStore::new();
        let group = store
            .insert_group(new_group(Some(1), "Kinematics"))
            .await
            .unwrap();

        assert_eq!(group.id, 1);
        assert_eq!(group.created_at, group.updated_at);
        assert_eq!(store.get_group(group.id).await.unwrap(), Some(group));
        assert!(store.get_group(99).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_missing_group_returns_none() {
        let store = MemoryStore::new();
        let patch = GroupPatch {
            name: Some("Renamed".to_string()),
            ..Default::default()
        };
        let updated = store.update_group(5, &patch, Utc::now()).await.unwrap();
        assert!(updated.is_none());
    }

    #[tokio::test]
    async fn test_list_groups_by_owner() {
        let store = MemoryStore::new();
        for (owner_id, name) in [(1, "First"), (1, "Second"), (2, "Other")] {
            let group = new_group(Some(owner_id), name);
            store.insert_group(group).await.unwrap();
        }
        store.insert_group(new_group(None, "Shared")).await.unwrap();

        let archive = GroupPatch {
            is_active: Some(false),
            ..Default::default()
        };
        // "Second" was stored with id 2.
        store.update_group(2, &archive, Utc::now()).await.unwrap();

        let active = store.list_groups_by_owner(1, false).await.unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].name, "First");

        let all = store.list_groups_by_owner(1, true).await.unwrap();
        let names: Vec<_> = all.iter().map(|group| group.name.as_str()).collect();
        assert_eq!(names, vec!["Second", "First"]);
    }

    #[tokio::test]
    async fn test_list_formulas_filters() {
        let store = MemoryStore::new();
        let basic = new_formula(Some(1), Difficulty::Basic);
        store.insert_formula(basic).await.unwrap();
        let advanced = store
            .insert_formula(new_formula(Some(1), Difficulty::Advanced))
            .await
            .unwrap();
        let ungrouped = new_formula(None, Difficulty::Basic);
        store.insert_formula(ungrouped).await.unwrap();
        store
            .update_formula(advanced.id, &FormulaPatch::archive(), Utc::now())
            .await
            .unwrap();

        let default_filter = FormulaFilter::default();
        let active = store.list_formulas(&default_filter).await.unwrap();
        assert_eq!(active.len(), 2);

        let group_filter = FormulaFilter {
            group_id: Some(1),
            include_inactive: true,
            ..Default::default()
        };
        assert_eq!(store.list_formulas(&group_filter).await.unwrap().len(), 2);

        let advanced_filter = FormulaFilter {
            difficulty: Some(Difficulty::Advanced),
            include_inactive: true,
            ..Default::default()
        };
        let found = store.list_formulas(&advanced_filter).await.unwrap();
        assert_eq!(found.len(), 1);
        assert!(!found[0].is_active);
    }

    #[tokio::test]
    async fn test_upsert_state_keeps_one_row() {
        let store = MemoryStore::new();
        let first = store
            .upsert_state(
                1,
                10,
                &StatePatch {
                    is_favorite: Some(true),
                    note: Some("units!".to_string()),
                    familiarity: None,
                },
                Utc::now(),
            )
            .await
            .unwrap();
        assert_eq!(first.familiarity, Familiarity::New);

        let second = store
            .upsert_state(
                1,
                10,
                &StatePatch {
                    familiarity: Some(Familiarity::Comfortable),
                    ..Default::default()
                },
                Utc::now(),
            )
            .await
            .unwrap();

        assert_eq!(second.id, first.id);
        assert!(second.is_favorite);
        assert_eq!(second.note.as_deref(), Some("units!"));
        assert_eq!(second.familiarity, Familiarity::Comfortable);
        assert_eq!(store.state_rows_for(1, 10).await, 1);
    }

    #[tokio::test]
    async fn test_concurrent_upserts_do_not_duplicate() {
        let store = Arc::new(MemoryStore::new());
        let mut handles = Vec::new();
        for i in 0..16 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                let patch = StatePatch {
                    is_favorite: Some(i % 2 == 0),
                    ..Default::default()
                };
                store.upsert_state(3, 30, &patch, Utc::now()).await
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        assert_eq!(store.state_rows_for(3, 30).await, 1);
    }

    #[tokio::test]
    async fn test_examples_listed_in_insertion_order() {
        let store = MemoryStore::new();
        for problem in ["first", "second"] {
            store
                .insert_example(NewExample {
                    formula_id: 4,
                    title: None,
                    problem: problem.to_string(),
                    solution: "42".to_string(),
                    data: None,
                    created_at: Utc::now(),
                })
                .await
                .unwrap();
        }

        let examples = store.list_examples(4).await.unwrap();
        let problems: Vec<_> = examples
            .iter()
            .map(|example| example.problem.as_str())
            .collect();
        assert_eq!(problems, vec!["first", "second"]);
        assert!(store.list_examples(5).await.unwrap().is_empty());
    }
}
