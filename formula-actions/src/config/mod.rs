//! Configuration module for the formula actions.
//! Defines the validation limits of the service and the wiring of its dependencies.
mod dependencies;
mod service;

pub use dependencies::{Dependencies, Settings};
pub use service::FormulaActionsConfig;
