//! MySQL/MariaDB SQL dialect (Strategy pattern).
//!
//! Provides MySQL-specific identifier quoting and the metadata queries used
//! to load foreign keys from `INFORMATION_SCHEMA`.

use crate::core::identifier::{quote_mysql, IdentifierCase};
use crate::core::traits::Dialect;
use crate::error::Result;

const RESERVED_WORDS: &[&str] = &[
    "ADD", "ALL", "ALTER", "AND", "AS", "ASC", "BETWEEN", "BY", "CASCADE", "CASE", "CHANGE",
    "CHECK", "COLUMN", "CONSTRAINT", "CREATE", "CROSS", "DATABASE", "DEFAULT", "DELETE",
    "DESC", "DISTINCT", "DROP", "ELSE", "EXISTS", "FOREIGN", "FROM", "GROUP", "HAVING", "IN",
    "INDEX", "INNER", "INSERT", "INTERVAL", "INTO", "IS", "JOIN", "KEY", "KEYS", "LEFT",
    "LIKE", "LIMIT", "LOCK", "NOT", "NULL", "ON", "OR", "ORDER", "PRIMARY", "RANGE",
    "REFERENCES", "RENAME", "REPLACE", "RESTRICT", "RIGHT", "SCHEMA", "SELECT", "SET",
    "TABLE", "THEN", "TO", "UNION", "UNIQUE", "UPDATE", "USING", "VALUES", "WHEN", "WHERE",
    "WITH",
];

/// MySQL/MariaDB dialect implementation.
///
/// Compatible with MySQL 5.7+, 8.0+, and MariaDB 10.2+. Unquoted
/// identifiers keep their case.
#[derive(Debug, Clone, Default)]
pub struct MysqlDialect;

impl MysqlDialect {
    /// Create a new MySQL dialect instance.
    pub fn new() -> Self {
        Self
    }

    /// Query listing foreign key columns of one table, one row per column.
    ///
    /// Binds `(schema, table)`. Columns come back as constraint name, column,
    /// referenced schema, referenced table, referenced column, referenced
    /// unique constraint, delete rule, update rule, ordered by constraint and
    /// key position.
    pub fn foreign_keys_query(&self) -> &'static str {
        r#"
            SELECT
                CAST(rc.CONSTRAINT_NAME AS CHAR(255)) AS CONSTRAINT_NAME,
                CAST(kcu.COLUMN_NAME AS CHAR(255)) AS COLUMN_NAME,
                CAST(kcu.REFERENCED_TABLE_SCHEMA AS CHAR(255)) AS REFERENCED_TABLE_SCHEMA,
                CAST(kcu.REFERENCED_TABLE_NAME AS CHAR(255)) AS REFERENCED_TABLE_NAME,
                CAST(kcu.REFERENCED_COLUMN_NAME AS CHAR(255)) AS REFERENCED_COLUMN_NAME,
                CAST(rc.UNIQUE_CONSTRAINT_NAME AS CHAR(255)) AS UNIQUE_CONSTRAINT_NAME,
                CAST(rc.DELETE_RULE AS CHAR(32)) AS DELETE_RULE,
                CAST(rc.UPDATE_RULE AS CHAR(32)) AS UPDATE_RULE
            FROM INFORMATION_SCHEMA.REFERENTIAL_CONSTRAINTS rc
            JOIN INFORMATION_SCHEMA.KEY_COLUMN_USAGE kcu
                ON rc.CONSTRAINT_SCHEMA = kcu.CONSTRAINT_SCHEMA
                AND rc.CONSTRAINT_NAME = kcu.CONSTRAINT_NAME
                AND rc.TABLE_NAME = kcu.TABLE_NAME
            WHERE rc.CONSTRAINT_SCHEMA = ? AND rc.TABLE_NAME = ?
            ORDER BY rc.CONSTRAINT_NAME, kcu.ORDINAL_POSITION
        "#
    }
}

impl Dialect for MysqlDialect {
    fn name(&self) -> &str {
        "mysql"
    }

    fn identifier_case(&self) -> IdentifierCase {
        IdentifierCase::Mixed
    }

    fn quote_ident(&self, name: &str) -> Result<String> {
        quote_mysql(name)
    }

    fn extra_ident_chars(&self) -> &'static [char] {
        &['$']
    }

    fn reserved_words(&self) -> &'static [&'static str] {
        RESERVED_WORDS
    }
}
