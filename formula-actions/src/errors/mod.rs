//! Error types for the formula actions.
//! Consolidates the errors surfaced to callers and the errors raised while wiring
//! dependencies.
mod action;
mod dependency;

pub use action::{ActionError, ErrorKind, ResourceKind};
pub use dependency::DependencyError;
