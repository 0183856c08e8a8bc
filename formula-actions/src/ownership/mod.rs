//! Ownership resolution for owner-gated records.
//!
//! Only groups carry an owner. A formula defers to the group it is filed under,
//! and anything attached to a formula defers to the formula. Each record type
//! describes where its authority comes from through [`Authorizable::access`],
//! and [`OwnershipResolver::check`] walks that chain until it reaches a group
//! owner or a record with no gate.
use std::sync::Arc;

use formula_repository::{FormulaRepository, GroupRepository};
use formula_shared::types::{
    Formula, FormulaExample, FormulaGroup, FormulaId, GroupId, NewExample, UserId,
};
use tracing::{debug, warn};

use crate::errors::{ActionError, ResourceKind};

/// Where the authority over a record comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// The record is a group. `owner_id: None` marks a shared group.
    Owner {
        group_id: GroupId,
        owner_id: Option<UserId>,
    },
    /// The record defers to a group, or is unrestricted when it has none.
    Group(Option<GroupId>),
    /// The record defers to a formula, which must exist.
    Formula(FormulaId),
}

/// A record whose mutation rights come from the ownership chain.
pub trait Authorizable {
    fn access(&self) -> Access;
}

impl Authorizable for FormulaGroup {
    fn access(&self) -> Access {
        Access::Owner {
            group_id: self.id,
            owner_id: self.owner_id,
        }
    }
}

impl Authorizable for Formula {
    fn access(&self) -> Access {
        Access::Group(self.group_id)
    }
}

impl Authorizable for FormulaExample {
    fn access(&self) -> Access {
        Access::Formula(self.formula_id)
    }
}

impl Authorizable for NewExample {
    fn access(&self) -> Access {
        Access::Formula(self.formula_id)
    }
}

/// Resolves whether a user may view or mutate a record.
#[derive(Clone)]
pub struct OwnershipResolver {
    groups: Arc<dyn GroupRepository>,
    formulas: Arc<dyn FormulaRepository>,
}

impl OwnershipResolver {
    pub fn new(groups: Arc<dyn GroupRepository>, formulas: Arc<dyn FormulaRepository>) -> Self {
        Self { groups, formulas }
    }

    /// Fetches a group and checks that `user_id` may use it.
    ///
    /// # Returns
    ///
    /// * `Ok(FormulaGroup)` - The group is shared or owned by `user_id`
    /// * `Err(ActionError::NotFound)` - No group with this id exists
    /// * `Err(ActionError::Forbidden)` - The group is owned by someone else
    pub async fn resolve_group(
        &self,
        group_id: GroupId,
        user_id: UserId,
    ) -> Result<FormulaGroup, ActionError> {
        let group = self.fetch_group(group_id).await?;
        self.authorize(&group, user_id).await?;
        Ok(group)
    }

    /// Fetches a formula and checks that `user_id` may edit it through its group.
    pub async fn resolve_formula(
        &self,
        formula_id: FormulaId,
        user_id: UserId,
    ) -> Result<Formula, ActionError> {
        let formula = self.fetch_formula(formula_id).await?;
        self.authorize(&formula, user_id).await?;
        Ok(formula)
    }

    /// Checks an already loaded record against the ownership chain.
    pub async fn authorize<R: Authorizable + ?Sized>(
        &self,
        resource: &R,
        user_id: UserId,
    ) -> Result<(), ActionError> {
        self.check(resource.access(), user_id).await
    }

    /// Walks the ownership chain starting from `access` until a decision is reached.
    pub async fn check(&self, access: Access, user_id: UserId) -> Result<(), ActionError> {
        let mut access = access;
        loop {
            access = match access {
                Access::Owner { owner_id: None, .. } | Access::Group(None) => return Ok(()),
                Access::Owner {
                    group_id,
                    owner_id: Some(owner_id),
                } => {
                    if owner_id == user_id {
                        return Ok(());
                    }
                    warn!(
                        group_id = group_id,
                        user_id = user_id,
                        "Access to owner-gated group denied"
                    );
                    return Err(ActionError::forbidden(ResourceKind::FormulaGroup, group_id));
                }
                Access::Group(Some(group_id)) => self.fetch_group(group_id).await?.access(),
                Access::Formula(formula_id) => self.fetch_formula(formula_id).await?.access(),
            };
        }
    }

    async fn fetch_group(&self, group_id: GroupId) -> Result<FormulaGroup, ActionError> {
        debug!(group_id = group_id, "Resolving formula group");
        self.groups
            .get_group(group_id)
            .await?
            .ok_or_else(|| ActionError::not_found(ResourceKind::FormulaGroup, group_id))
    }

    async fn fetch_formula(&self, formula_id: FormulaId) -> Result<Formula, ActionError> {
        debug!(formula_id = formula_id, "Resolving formula");
        self.formulas
            .get_formula(formula_id)
            .await?
            .ok_or_else(|| ActionError::not_found(ResourceKind::Formula, formula_id))
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use formula_repository::{ExampleRepository, MemoryStore};
    use formula_shared::types::{Difficulty, NewFormula, NewGroup};

    use super::*;

    struct Fixture {
        store: Arc<MemoryStore>,
        resolver: OwnershipResolver,
    }

    impl Fixture {
        fn new() -> Self {
            let store = Arc::new(MemoryStore::new());
            let resolver = OwnershipResolver::new(store.clone(), store.clone());
            Self { store, resolver }
        }

        async fn group(&self, owner_id: Option<UserId>) -> FormulaGroup {
            self.store
                .insert_group(NewGroup {
                    owner_id,
                    name: "Optics".to_string(),
                    subject: None,
                    tags: None,
                    description: None,
                    slug: None,
                    is_active: true,
                    created_at: Utc::now(),
                })
                .await
                .unwrap()
        }

        async fn formula(&self, group_id: Option<GroupId>) -> Formula {
            self.store
                .insert_formula(NewFormula {
                    group_id,
                    name: "Snell's law".to_string(),
                    expression: "n1 sin θ1 = n2 sin θ2".to_string(),
                    description: None,
                    variables: None,
                    meta: None,
                    difficulty: Difficulty::Intermediate,
                    is_active: true,
                    created_at: Utc::now(),
                })
                .await
                .unwrap()
        }
    }

    #[tokio::test]
    async fn test_owner_may_resolve_group() {
        let fixture = Fixture::new();
        let group = fixture.group(Some(1)).await;

        let resolved = fixture.resolver.resolve_group(group.id, 1).await.unwrap();
        assert_eq!(resolved, group);
    }

    #[tokio::test]
    async fn test_other_user_is_forbidden() {
        let fixture = Fixture::new();
        let group = fixture.group(Some(1)).await;

        let err = fixture
            .resolver
            .resolve_group(group.id, 2)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ActionError::Forbidden {
                resource: ResourceKind::FormulaGroup,
                id
            } if id == group.id
        ));
    }

    #[tokio::test]
    async fn test_shared_group_is_open_to_everyone() {
        let fixture = Fixture::new();
        let group = fixture.group(None).await;

        for user_id in [1, 2, 99] {
            let resolved = fixture.resolver.resolve_group(group.id, user_id).await;
            assert!(resolved.is_ok());
        }
    }

    #[tokio::test]
    async fn test_missing_group_is_not_found() {
        let fixture = Fixture::new();
        let err = fixture.resolver.resolve_group(42, 1).await.unwrap_err();
        assert!(matches!(
            err,
            ActionError::NotFound {
                resource: ResourceKind::FormulaGroup,
                id: 42
            }
        ));
    }

    #[tokio::test]
    async fn test_formula_defers_to_group_owner() {
        let fixture = Fixture::new();
        let group = fixture.group(Some(1)).await;
        let formula = fixture.formula(Some(group.id)).await;

        let resolved = fixture.resolver.resolve_formula(formula.id, 1).await;
        assert!(resolved.is_ok());
        assert!(matches!(
            fixture.resolver.resolve_formula(formula.id, 2).await,
            Err(ActionError::Forbidden { .. })
        ));
    }

    #[tokio::test]
    async fn test_formula_without_group_is_open() {
        let fixture = Fixture::new();
        let formula = fixture.formula(None).await;

        let resolved = fixture.resolver.resolve_formula(formula.id, 7).await;
        assert!(resolved.is_ok());
    }

    #[tokio::test]
    async fn test_formula_in_shared_group_is_open() {
        let fixture = Fixture::new();
        let group = fixture.group(None).await;
        let formula = fixture.formula(Some(group.id)).await;

        let resolved = fixture.resolver.resolve_formula(formula.id, 7).await;
        assert!(resolved.is_ok());
    }

    #[tokio::test]
    async fn test_formula_with_dangling_group_is_not_found() {
        let fixture = Fixture::new();
        let formula = fixture.formula(Some(500)).await;

        let err = fixture
            .resolver
            .resolve_formula(formula.id, 1)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ActionError::NotFound {
                resource: ResourceKind::FormulaGroup,
                id: 500
            }
        ));
    }

    #[tokio::test]
    async fn test_check_walks_formula_chain() {
        let fixture = Fixture::new();
        let group = fixture.group(Some(1)).await;
        let formula = fixture.formula(Some(group.id)).await;

        let allowed = fixture.resolver.check(Access::Formula(formula.id), 1).await;
        assert!(allowed.is_ok());
        assert!(matches!(
            fixture.resolver.check(Access::Formula(formula.id), 3).await,
            Err(ActionError::Forbidden { id, .. }) if id == group.id
        ));
        assert!(matches!(
            fixture.resolver.check(Access::Formula(999), 1).await,
            Err(ActionError::NotFound {
                resource: ResourceKind::Formula,
                id: 999
            })
        ));
    }

    #[tokio::test]
    async fn test_example_defers_to_formula_group() {
        let fixture = Fixture::new();
        let group = fixture.group(Some(1)).await;
        let formula = fixture.formula(Some(group.id)).await;
        let example = NewExample {
            formula_id: formula.id,
            title: None,
            problem: "Light enters water at 30°".to_string(),
            solution: "θ2 ≈ 22°".to_string(),
            data: None,
            created_at: Utc::now(),
        };

        assert!(fixture.resolver.authorize(&example, 1).await.is_ok());
        assert!(matches!(
            fixture.resolver.authorize(&example, 2).await,
            Err(ActionError::Forbidden { .. })
        ));
    }

    #[tokio::test]
    async fn test_stored_example_defers_to_formula_group() {
        let fixture = Fixture::new();
        let group = fixture.group(Some(1)).await;
        let formula = fixture.formula(Some(group.id)).await;
        let example = fixture
            .store
            .insert_example(NewExample {
                formula_id: formula.id,
                title: Some("Critical angle".to_string()),
                problem: "Glass to air, n = 1.5".to_string(),
                solution: "θc = arcsin(1 / 1.5) ≈ 41.8°".to_string(),
                data: None,
                created_at: Utc::now(),
            })
            .await
            .unwrap();

        assert_eq!(example.access(), Access::Formula(formula.id));
        assert!(fixture.resolver.authorize(&example, 1).await.is_ok());
        assert!(matches!(
            fixture.resolver.authorize(&example, 2).await,
            Err(ActionError::Forbidden { id, .. }) if id == group.id
        ));
    }
}
