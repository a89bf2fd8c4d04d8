//! Database driver implementations.
//!
//! This module provides database-specific implementations of the core traits:
//!
//! - [`mysql`]: MySQL/MariaDB dialect and foreign key metadata loading
//! - [`oracle`]: Oracle dialect and administrative tools
//! - [`postgres`]: PostgreSQL dialect
//!
//! # Static dispatch
//!
//! Instead of dynamic dispatch via `Box<dyn Dialect>`, [`DialectImpl`] is an
//! enum whose variants implement the trait directly; the compiler generates a
//! match instead of a vtable call.
//!
//! # Adding New Databases
//!
//! 1. Create a new module under `drivers/` (e.g., `drivers/sqlite/`)
//! 2. Implement the `Dialect` trait
//! 3. Add an enum variant to `DialectImpl` and a name in `from_db_type`

pub mod mysql;
pub mod oracle;
pub mod postgres;

pub use mysql::MysqlDialect;
pub use oracle::OracleDialect;
pub use postgres::PostgresDialect;

use crate::core::identifier::IdentifierCase;
use crate::core::traits::Dialect;
use crate::error::{DbError, Result};

/// Enum-based static dispatch for dialects.
#[derive(Debug, Clone)]
pub enum DialectImpl {
    Mysql(MysqlDialect),
    Oracle(OracleDialect),
    Postgres(PostgresDialect),
}

impl Dialect for DialectImpl {
    fn name(&self) -> &str {
        match self {
            DialectImpl::Mysql(d) => d.name(),
            DialectImpl::Oracle(d) => d.name(),
            DialectImpl::Postgres(d) => d.name(),
        }
    }

    fn identifier_case(&self) -> IdentifierCase {
        match self {
            DialectImpl::Mysql(d) => d.identifier_case(),
            DialectImpl::Oracle(d) => d.identifier_case(),
            DialectImpl::Postgres(d) => d.identifier_case(),
        }
    }

    fn quote_ident(&self, name: &str) -> Result<String> {
        match self {
            DialectImpl::Mysql(d) => d.quote_ident(name),
            DialectImpl::Oracle(d) => d.quote_ident(name),
            DialectImpl::Postgres(d) => d.quote_ident(name),
        }
    }

    fn extra_ident_chars(&self) -> &'static [char] {
        match self {
            DialectImpl::Mysql(d) => d.extra_ident_chars(),
            DialectImpl::Oracle(d) => d.extra_ident_chars(),
            DialectImpl::Postgres(d) => d.extra_ident_chars(),
        }
    }

    fn reserved_words(&self) -> &'static [&'static str] {
        match self {
            DialectImpl::Mysql(d) => d.reserved_words(),
            DialectImpl::Oracle(d) => d.reserved_words(),
            DialectImpl::Postgres(d) => d.reserved_words(),
        }
    }
}

impl DialectImpl {
    /// Create a dialect implementation from a database type string.
    ///
    /// # Errors
    ///
    /// Returns an error if the database type is not recognized.
    pub fn from_db_type(db_type: &str) -> Result<Self> {
        match db_type.to_lowercase().as_str() {
            "mysql" | "mariadb" => Ok(DialectImpl::Mysql(MysqlDialect::new())),
            "oracle" | "ora" => Ok(DialectImpl::Oracle(OracleDialect::new())),
            "postgres" | "postgresql" | "pg" => Ok(DialectImpl::Postgres(PostgresDialect::new())),
            other => Err(DbError::Config(format!(
                "Unknown database type: '{}'. Supported types: mysql, oracle, postgres",
                other
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dialect_impl_from_db_type() {
        let mysql = DialectImpl::from_db_type("mysql").unwrap();
        assert_eq!(mysql.name(), "mysql");

        let oracle = DialectImpl::from_db_type("Oracle").unwrap();
        assert_eq!(oracle.name(), "oracle");

        assert!(DialectImpl::from_db_type("mariadb").is_ok());
        assert!(DialectImpl::from_db_type("postgresql").is_ok());
        assert!(DialectImpl::from_db_type("pg").is_ok());

        assert!(DialectImpl::from_db_type("db2").is_err());
    }

    #[test]
    fn test_dialect_impl_dispatch() {
        let dialect = DialectImpl::Oracle(OracleDialect::new());
        assert_eq!(dialect.quote_ident("t").unwrap(), "\"t\"");
        assert_eq!(dialect.quote_ident_if_needed("EMP").unwrap(), "EMP");

        let dialect = DialectImpl::Mysql(MysqlDialect::new());
        assert_eq!(dialect.quote_ident("t").unwrap(), "`t`");
        assert_eq!(dialect.identifier_case(), IdentifierCase::Mixed);
    }
}
