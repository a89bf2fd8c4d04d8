//! Centralized identifier validation and quoting.
//!
//! SQL identifiers (table names, column names, schema names) cannot be passed as
//! parameters in prepared statements, so every generated statement embeds them
//! as text. Before that happens we:
//! 1. Validate identifiers for suspicious patterns (null bytes, excessive length)
//! 2. Decide whether the dialect needs the identifier quoted at all
//! 3. Apply database-specific quoting (double quotes or backticks), escaping
//!    the quote character inside the name

use crate::error::{DbError, Result};

/// Maximum identifier length (conservative limit across databases).
/// - PostgreSQL: 63 bytes
/// - MySQL: 64 characters
/// - Oracle: 128 bytes (12.2+)
const MAX_IDENTIFIER_LENGTH: usize = 128;

/// How a database folds unquoted identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentifierCase {
    /// Unquoted names are stored upper case (Oracle).
    Upper,
    /// Unquoted names are stored lower case (PostgreSQL).
    Lower,
    /// Unquoted names keep their case (MySQL).
    Mixed,
}

/// Validate an identifier for security issues.
///
/// Rejects:
/// - Empty identifiers
/// - Identifiers containing null bytes
/// - Identifiers exceeding maximum length
///
/// # Errors
///
/// Returns `DbError::Config` for invalid identifiers with a descriptive message.
pub fn validate_identifier(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(DbError::Config("Identifier cannot be empty".to_string()));
    }

    if name.contains('\0') {
        return Err(DbError::Config(format!(
            "SECURITY: Identifier contains null byte (possible injection attempt): {:?}",
            name
        )));
    }

    if name.len() > MAX_IDENTIFIER_LENGTH {
        return Err(DbError::Config(format!(
            "SECURITY: Identifier exceeds maximum length of {} bytes (got {} bytes): {:?}",
            MAX_IDENTIFIER_LENGTH,
            name.len(),
            name
        )));
    }

    Ok(())
}

/// Quote an identifier with double quotes (Oracle, PostgreSQL, ANSI).
///
/// ```ignore
/// assert_eq!(quote_double("users")?, "\"users\"");
/// assert_eq!(quote_double("table\"name")?, "\"table\"\"name\"");
/// ```
pub fn quote_double(name: &str) -> Result<String> {
    validate_identifier(name)?;
    Ok(format!("\"{}\"", name.replace('"', "\"\"")))
}

/// Quote a MySQL identifier using backticks.
///
/// ```ignore
/// assert_eq!(quote_mysql("users")?, "`users`");
/// assert_eq!(quote_mysql("table`name")?, "`table``name`");
/// ```
pub fn quote_mysql(name: &str) -> Result<String> {
    validate_identifier(name)?;
    Ok(format!("`{}`", name.replace('`', "``")))
}

/// Check whether `name` can appear unquoted and still resolve to itself.
///
/// The name must start with a letter (or underscore where allowed), contain
/// only word characters plus the dialect's extra characters, already be in
/// the case the database folds unquoted names to, and not be a reserved word.
pub fn is_plain_identifier(
    name: &str,
    case: IdentifierCase,
    extra_chars: &[char],
    reserved: &[&str],
) -> bool {
    let mut chars = name.chars();
    let first = match chars.next() {
        Some(c) => c,
        None => return false,
    };
    if !first.is_ascii_alphabetic() && !(first == '_' && case != IdentifierCase::Upper) {
        return false;
    }
    if !name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || extra_chars.contains(&c))
    {
        return false;
    }
    let case_ok = match case {
        IdentifierCase::Upper => !name.chars().any(|c| c.is_ascii_lowercase()),
        IdentifierCase::Lower => !name.chars().any(|c| c.is_ascii_uppercase()),
        IdentifierCase::Mixed => true,
    };
    case_ok && !reserved.iter().any(|kw| kw.eq_ignore_ascii_case(name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_identifier_normal() {
        assert!(validate_identifier("users").is_ok());
        assert!(validate_identifier("my_table").is_ok());
        assert!(validate_identifier("column with spaces").is_ok());
        assert!(validate_identifier("日本語").is_ok());
    }

    #[test]
    fn test_validate_identifier_rejects_empty() {
        let result = validate_identifier("");
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("empty"));
    }

    #[test]
    fn test_validate_identifier_rejects_null_byte() {
        let result = validate_identifier("table\0name");
        assert!(result.unwrap_err().to_string().contains("null byte"));
    }

    #[test]
    fn test_validate_identifier_length_limit() {
        let max_name = "a".repeat(MAX_IDENTIFIER_LENGTH);
        assert!(validate_identifier(&max_name).is_ok());

        let long_name = "a".repeat(MAX_IDENTIFIER_LENGTH + 1);
        let result = validate_identifier(&long_name);
        assert!(result.unwrap_err().to_string().contains("maximum length"));
    }

    #[test]
    fn test_quote_double_escapes() {
        assert_eq!(quote_double("users").unwrap(), "\"users\"");
        assert_eq!(quote_double("a\"b\"c").unwrap(), "\"a\"\"b\"\"c\"");
        assert!(quote_double("").is_err());
    }

    #[test]
    fn test_quote_mysql_escapes_backtick() {
        assert_eq!(quote_mysql("users").unwrap(), "`users`");
        assert_eq!(quote_mysql("table`name").unwrap(), "`table``name`");
        assert_eq!(
            quote_mysql("Robert`); DROP TABLE Students;--").unwrap(),
            "`Robert``); DROP TABLE Students;--`"
        );
    }

    #[test]
    fn test_plain_identifier_upper_case_folding() {
        let extra = ['$', '#'];
        assert!(is_plain_identifier("EMPLOYEES", IdentifierCase::Upper, &extra, &[]));
        assert!(is_plain_identifier("SYS$LOG#1", IdentifierCase::Upper, &extra, &[]));
        assert!(!is_plain_identifier("Employees", IdentifierCase::Upper, &extra, &[]));
        assert!(!is_plain_identifier("_HIDDEN", IdentifierCase::Upper, &extra, &[]));
        assert!(!is_plain_identifier("1ST", IdentifierCase::Upper, &extra, &[]));
        assert!(!is_plain_identifier("MY TABLE", IdentifierCase::Upper, &extra, &[]));
    }

    #[test]
    fn test_plain_identifier_reserved_words() {
        let reserved = ["TABLE", "SELECT"];
        assert!(!is_plain_identifier("TABLE", IdentifierCase::Upper, &[], &reserved));
        assert!(!is_plain_identifier("select", IdentifierCase::Mixed, &[], &reserved));
        assert!(is_plain_identifier("TABLES", IdentifierCase::Upper, &[], &reserved));
    }

    #[test]
    fn test_plain_identifier_lower_and_mixed() {
        assert!(is_plain_identifier("orders", IdentifierCase::Lower, &[], &[]));
        assert!(!is_plain_identifier("Orders", IdentifierCase::Lower, &[], &[]));
        assert!(is_plain_identifier("Orders", IdentifierCase::Mixed, &[], &[]));
        assert!(is_plain_identifier("_tmp", IdentifierCase::Mixed, &[], &[]));
        assert!(!is_plain_identifier("", IdentifierCase::Mixed, &[], &[]));
    }
}
