use formula_repository::RepositoryError;
use thiserror::Error;

/// Errors raised while reading configuration and wiring dependencies.
#[derive(Debug, Error)]
pub enum DependencyError {
    #[error("Missing environment variable: {0}")]
    MissingEnv(&'static str),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),

    #[error("Database schema is missing; run the migrations in formula-repository/src/postgres/migrations")]
    SchemaMissing,

    #[error("Tracing initialization failed: {0}")]
    Tracing(String),
}
