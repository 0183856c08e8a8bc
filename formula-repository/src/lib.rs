//! # Formula Repository
//! This crate provides traits and implementations for interacting with the
//! formula data store. It includes definitions for errors, interfaces, a
//! concrete implementation for PostgreSQL and an in-memory implementation
//! used for local development and tests.
pub mod errors;
pub mod interfaces;
pub mod memory;
pub mod postgres;

pub use errors::RepositoryError;
pub use interfaces::{ExampleRepository, FormulaRepository, GroupRepository, UserStateRepository};
pub use memory::MemoryStore;
pub use postgres::{
    PostgresExampleRepository, PostgresFormulaRepository, PostgresGroupRepository,
    PostgresUserStateRepository,
};
