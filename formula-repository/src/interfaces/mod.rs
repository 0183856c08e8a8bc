//! This module defines and re-exports the interfaces for the formula repository.
//! It serves as a central point for accessing traits related to data interaction.
mod examples;
mod formulas;
mod groups;
mod user_states;

pub use examples::ExampleRepository;
pub use formulas::FormulaRepository;
pub use groups::GroupRepository;
pub use user_states::UserStateRepository;
