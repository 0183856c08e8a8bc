//! Error types for the formula repository.
//! Consolidates and re-exports error types related to store operations.
mod repository;

pub use repository::RepositoryError;
