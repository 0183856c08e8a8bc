//! Action handlers.
//!
//! Every handler follows the same sequence: authenticate the caller, validate the
//! input, resolve ownership when the target is gated by a group, perform the store
//! operation, and wrap the result in an [`Envelope`](crate::envelope::Envelope).
//! Store failures are never retried.
use std::sync::Arc;

use formula_repository::{
    ExampleRepository, FormulaRepository, GroupRepository, MemoryStore, PostgresExampleRepository,
    PostgresFormulaRepository, PostgresGroupRepository, PostgresUserStateRepository,
    UserStateRepository,
};

use crate::config::FormulaActionsConfig;
use crate::ownership::OwnershipResolver;

mod examples;
mod formulas;
mod groups;
mod user_states;
mod validation;

pub use examples::{CreateExampleInput, ListExamplesInput};
pub use formulas::{CreateFormulaInput, FormulaIdInput, UpdateFormulaInput};
pub use groups::{CreateGroupInput, GroupIdInput, ListMyGroupsInput, UpdateGroupInput};
pub use user_states::UpsertStateInput;

/// The stores the actions operate on.
#[derive(Clone)]
pub struct Repositories {
    pub groups: Arc<dyn GroupRepository>,
    pub formulas: Arc<dyn FormulaRepository>,
    pub examples: Arc<dyn ExampleRepository>,
    pub states: Arc<dyn UserStateRepository>,
}

impl Repositories {
    /// PostgreSQL repositories sharing one pool.
    pub fn postgres(pool: sqlx::PgPool) -> Self {
        Self {
            groups: Arc::new(PostgresGroupRepository::new(pool.clone())),
            formulas: Arc::new(PostgresFormulaRepository::new(pool.clone())),
            examples: Arc::new(PostgresExampleRepository::new(pool.clone())),
            states: Arc::new(PostgresUserStateRepository::new(pool)),
        }
    }

    /// Every repository backed by the same in-memory store.
    pub fn memory(store: Arc<MemoryStore>) -> Self {
        Self {
            groups: store.clone(),
            formulas: store.clone(),
            examples: store.clone(),
            states: store,
        }
    }
}

/// Typed actions over groups, formulas, examples and user state.
#[derive(Clone)]
pub struct FormulaActions {
    repos: Repositories,
    resolver: OwnershipResolver,
    config: FormulaActionsConfig,
}

impl FormulaActions {
    /// Create the actions with the default validation limits.
    pub fn new(repos: Repositories) -> Self {
        Self::with_config(repos, FormulaActionsConfig::default())
    }

    /// Create the actions with custom validation limits.
    ///
    /// # Arguments
    ///
    /// * `repos` - The stores to operate on
    /// * `config` - Input limits enforced before any store access
    pub fn with_config(repos: Repositories, config: FormulaActionsConfig) -> Self {
        let resolver = OwnershipResolver::new(repos.groups.clone(), repos.formulas.clone());
        Self {
            repos,
            resolver,
            config,
        }
    }

    /// Actions over a fresh in-memory store.
    pub fn in_memory() -> Self {
        Self::new(Repositories::memory(Arc::new(MemoryStore::new())))
    }

    pub fn config(&self) -> &FormulaActionsConfig {
        &self.config
    }
}
