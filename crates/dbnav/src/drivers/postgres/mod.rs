//! PostgreSQL driver.
//!
//! - [`PostgresDialect`]: identifier syntax for PostgreSQL

mod dialect;

pub use dialect::PostgresDialect;
