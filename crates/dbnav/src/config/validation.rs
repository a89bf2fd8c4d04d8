//! Configuration validation.

use super::Config;
use crate::core::identifier::validate_identifier;
use crate::drivers::DialectImpl;
use crate::error::{DbError, Result};

/// Validate the configuration.
pub fn validate(config: &Config) -> Result<()> {
    let ds = &config.data_source;
    if ds.name.trim().is_empty() {
        return Err(DbError::Config("data_source.name is required".into()));
    }

    DialectImpl::from_db_type(&ds.r#type).map_err(|e| field_error("data_source.type", e))?;

    if let Some(schema) = &ds.schema {
        validate_identifier(schema).map_err(|e| field_error("data_source.schema", e))?;
    }

    Ok(())
}

/// Prefix a nested error with the offending field, without repeating the
/// "Configuration error" label.
fn field_error(field: &str, e: DbError) -> DbError {
    match e {
        DbError::Config(msg) => DbError::Config(format!("{}: {}", field, msg)),
        other => DbError::Config(format!("{}: {}", field, other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CursorConfig, DataSourceConfig, ToolsConfig};

    fn valid_config() -> Config {
        Config {
            data_source: DataSourceConfig {
                name: "prod".to_string(),
                r#type: "oracle".to_string(),
                schema: Some("HR".to_string()),
            },
            tools: ToolsConfig::default(),
            cursor: CursorConfig::default(),
        }
    }

    #[test]
    fn test_valid_config() {
        assert!(validate(&valid_config()).is_ok());
    }

    #[test]
    fn test_missing_name() {
        let mut config = valid_config();
        config.data_source.name = "  ".to_string();
        let err = validate(&config).unwrap_err();
        assert!(err.to_string().contains("data_source.name"));
    }

    #[test]
    fn test_unknown_type() {
        let mut config = valid_config();
        config.data_source.r#type = "sybase".to_string();
        let err = validate(&config).unwrap_err();
        assert!(matches!(err, DbError::Config(_)));
        let message = err.to_string();
        assert!(message.starts_with("Configuration error: data_source.type: "));
        assert_eq!(message.matches("Configuration error").count(), 1);
    }

    #[test]
    fn test_bad_schema() {
        let mut config = valid_config();
        config.data_source.schema = Some(String::new());
        let err = validate(&config).unwrap_err();
        assert!(err.to_string().contains("data_source.schema"));
        assert_eq!(err.to_string().matches("Configuration error").count(), 1);
    }

    #[test]
    fn test_schema_optional() {
        let mut config = valid_config();
        config.data_source.schema = None;
        assert!(validate(&config).is_ok());
    }
}
