//! MySQL/MariaDB driver.
//!
//! - [`MysqlDialect`]: identifier syntax and metadata queries
//! - [`load_foreign_keys`]: builds foreign keys from `INFORMATION_SCHEMA` rows
//!
//! # Supported Versions
//!
//! - MySQL 5.7+, 8.0+
//! - MariaDB 10.2+

mod dialect;
mod metadata;

pub use dialect::MysqlDialect;
pub use metadata::load_foreign_keys;
