//! # Formula Actions
//!
//! This library exposes the typed actions of the formula reference backend:
//! create/update/list/archive for groups and formulas, create/list for worked
//! examples, and upsert/list for per-user formula state. Every mutation of a
//! group or of anything filed under one goes through the ownership resolver.
//!
//! It also provides configuration, dependency wiring, and tracing setup for
//! the transport that embeds it.

pub mod actions;
pub mod auth;
pub mod config;
pub mod dispatch;
pub mod envelope;
pub mod errors;
pub mod ownership;
pub mod telemetry;

pub use actions::{FormulaActions, Repositories};
pub use auth::CurrentUser;
pub use config::{Dependencies, FormulaActionsConfig, Settings};
pub use dispatch::Procedure;
pub use envelope::Envelope;
pub use errors::{ActionError, DependencyError, ErrorKind, ResourceKind};
pub use ownership::{Access, Authorizable, OwnershipResolver};
