//! PostgreSQL SQL dialect (Strategy pattern).

use crate::core::identifier::{quote_double, IdentifierCase};
use crate::core::traits::Dialect;
use crate::error::Result;

const RESERVED_WORDS: &[&str] = &[
    "ALL", "ANALYSE", "ANALYZE", "AND", "ANY", "ARRAY", "AS", "ASC", "ASYMMETRIC", "BOTH",
    "CASE", "CAST", "CHECK", "COLLATE", "COLUMN", "CONSTRAINT", "CREATE", "CURRENT_DATE",
    "CURRENT_ROLE", "CURRENT_TIME", "CURRENT_TIMESTAMP", "CURRENT_USER", "DEFAULT",
    "DEFERRABLE", "DESC", "DISTINCT", "DO", "ELSE", "END", "EXCEPT", "FALSE", "FETCH", "FOR",
    "FOREIGN", "FROM", "GRANT", "GROUP", "HAVING", "IN", "INITIALLY", "INTERSECT", "INTO",
    "LATERAL", "LEADING", "LIMIT", "LOCALTIME", "LOCALTIMESTAMP", "NOT", "NULL", "OFFSET",
    "ON", "ONLY", "OR", "ORDER", "PLACING", "PRIMARY", "REFERENCES", "RETURNING", "SELECT",
    "SESSION_USER", "SOME", "SYMMETRIC", "TABLE", "THEN", "TO", "TRAILING", "TRUE", "UNION",
    "UNIQUE", "USER", "USING", "VARIADIC", "WHEN", "WHERE", "WINDOW", "WITH",
];

/// PostgreSQL dialect implementation.
///
/// Unquoted identifiers fold to lower case.
#[derive(Debug, Clone, Default)]
pub struct PostgresDialect;

impl PostgresDialect {
    /// Create a new PostgreSQL dialect instance.
    pub fn new() -> Self {
        Self
    }
}

impl Dialect for PostgresDialect {
    fn name(&self) -> &str {
        "postgres"
    }

    fn identifier_case(&self) -> IdentifierCase {
        IdentifierCase::Lower
    }

    fn quote_ident(&self, name: &str) -> Result<String> {
        quote_double(name)
    }

    fn extra_ident_chars(&self) -> &'static [char] {
        &['$']
    }

    fn reserved_words(&self) -> &'static [&'static str] {
        RESERVED_WORDS
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::EvaluationContext;

    #[test]
    fn test_quote_ident() {
        let dialect = PostgresDialect::new();
        assert_eq!(dialect.quote_ident("table").unwrap(), "\"table\"");
        assert_eq!(dialect.quote_ident("a\"b").unwrap(), "\"a\"\"b\"");
    }

    #[test]
    fn test_quote_if_needed_lower_case() {
        let dialect = PostgresDialect::new();
        assert_eq!(dialect.quote_ident_if_needed("orders").unwrap(), "orders");
        assert_eq!(dialect.quote_ident_if_needed("Orders").unwrap(), "\"Orders\"");
        assert_eq!(dialect.quote_ident_if_needed("user").unwrap(), "\"user\"");
    }

    #[test]
    fn test_qualify() {
        let dialect = PostgresDialect::new();
        assert_eq!(
            dialect
                .qualify(&["public", "Order Items"], EvaluationContext::Ddl)
                .unwrap(),
            "public.\"Order Items\""
        );
    }
}
