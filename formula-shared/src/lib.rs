//! # Formula Shared
//! This crate defines the data structures shared across the formula reference backend.
//! It includes the stored entities (groups, formulas, examples, per-user state), the
//! explicit patch records used for partial updates, and the listing filters.
pub mod types;
