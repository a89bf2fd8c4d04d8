//! Error types for the dbnav library.

use thiserror::Error;

/// Main error type for metadata, cursor and tool operations.
#[derive(Error, Debug)]
pub enum DbError {
    /// Configuration error (invalid YAML, missing fields, bad identifiers, etc.)
    #[error("Configuration error: {0}")]
    Config(String),

    /// A named column or attribute could not be found on its owner.
    #[error("Cannot resolve {name} on {object}")]
    Resolution { object: String, name: String },

    /// A fully qualified name could not be built for an object.
    #[error("Cannot build qualified name: {0}")]
    QualifiedName(String),

    /// A foreign key column mapping would be added twice.
    #[error("Duplicate column mapping {column} -> {referenced} in foreign key {constraint}")]
    DuplicateColumnMapping {
        constraint: String,
        column: String,
        referenced: String,
    },

    /// Result cursor failure (fetch or close).
    #[error("Cursor error: {0}")]
    Cursor(String),

    /// Rows were requested from a cursor that has already been closed.
    #[error("Cursor is closed")]
    CursorClosed,

    /// Native driver error with context
    #[error("Driver error: {message}\n  Context: {context}")]
    Driver { message: String, context: String },

    /// IO error (file operations)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML serialization/deserialization error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl DbError {
    /// Create a Resolution error for `name` missing on `object`.
    pub fn resolution(object: impl Into<String>, name: impl Into<String>) -> Self {
        DbError::Resolution {
            object: object.into(),
            name: name.into(),
        }
    }

    /// Create a Driver error with context about where it occurred
    pub fn driver(message: impl ToString, context: impl Into<String>) -> Self {
        DbError::Driver {
            message: message.to_string(),
            context: context.into(),
        }
    }

    /// Process exit code for this error, used by the CLI.
    pub fn exit_code(&self) -> u8 {
        match self {
            DbError::Config(_) | DbError::Yaml(_) | DbError::Json(_) => 1,
            DbError::Resolution { .. } | DbError::DuplicateColumnMapping { .. } => 2,
            DbError::QualifiedName(_) => 3,
            DbError::Cursor(_) | DbError::CursorClosed | DbError::Driver { .. } => 4,
            DbError::Io(_) => 7,
        }
    }

    /// Format error with full details including error chain
    pub fn format_detailed(&self) -> String {
        let mut output = format!("Error: {}\n", self);

        let mut source = std::error::Error::source(self);
        let mut depth = 1;
        while let Some(err) = source {
            output.push_str(&format!("\nCaused by:\n  {}: {}", depth, err));
            source = err.source();
            depth += 1;
        }

        output
    }
}

/// Result type alias for dbnav operations.
pub type Result<T> = std::result::Result<T, DbError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        assert_eq!(DbError::Config("x".into()).exit_code(), 1);
        assert_eq!(DbError::resolution("t", "c").exit_code(), 2);
        assert_eq!(DbError::QualifiedName("x".into()).exit_code(), 3);
        assert_eq!(DbError::CursorClosed.exit_code(), 4);
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        assert_eq!(DbError::from(io).exit_code(), 7);
    }

    #[test]
    fn test_resolution_message() {
        let err = DbError::resolution("table \"HR\".\"EMP\"", "column DEPT_ID");
        assert_eq!(
            err.to_string(),
            "Cannot resolve column DEPT_ID on table \"HR\".\"EMP\""
        );
    }

    #[test]
    fn test_format_detailed_includes_source() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "schema.yaml");
        let detailed = DbError::from(io).format_detailed();
        assert!(detailed.starts_with("Error: IO error: schema.yaml"));
    }
}
