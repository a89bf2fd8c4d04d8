//! Core abstractions shared by the model, cursor and tool modules.
//!
//! - [`identifier`]: identifier validation and quoting helpers
//! - [`traits`]: the [`Dialect`] strategy and the [`QualifiedName`] capability
//! - [`value`]: SQL values and rows fetched from cursors
//!
//! Driver modules (`drivers/mysql`, `drivers/oracle`, `drivers/postgres`)
//! implement these traits; nothing here knows about a specific database.

pub mod identifier;
pub mod traits;
pub mod value;

pub use identifier::IdentifierCase;
pub use traits::{Dialect, EvaluationContext, QualifiedName};
pub use value::{Row, SqlValue};
