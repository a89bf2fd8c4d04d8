//! Configuration loading and validation.

mod types;
mod validation;

pub use types::*;

use std::path::Path;
use std::sync::Arc;

use crate::error::Result;
use crate::model::DataSource;

impl Config {
    /// Load configuration from a YAML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Config = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        validation::validate(self)
    }

    /// Build the configured data source.
    pub fn data_source(&self) -> Result<Arc<DataSource>> {
        let ds = DataSource::from_db_type(&self.data_source.name, &self.data_source.r#type)?;
        Ok(Arc::new(ds))
    }

    /// Default schema for unqualified table names.
    pub fn default_schema(&self) -> Option<&str> {
        self.data_source.schema.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DbError;

    #[test]
    fn test_from_yaml_full() {
        let config = Config::from_yaml(
            r#"
data_source:
  name: prod
  type: oracle
  schema: HR
tools:
  truncate:
    reuse_storage: true
cursor:
  max_rows: 500
"#,
        )
        .unwrap();
        assert!(config.tools.truncate.reuse_storage);
        assert_eq!(config.cursor.max_rows, 500);
        assert_eq!(config.default_schema(), Some("HR"));
        assert_eq!(config.data_source().unwrap().db_type(), "oracle");
    }

    #[test]
    fn test_from_yaml_defaults() {
        let config = Config::from_yaml("data_source:\n  name: dev\n  type: pg\n").unwrap();
        assert!(!config.tools.truncate.reuse_storage);
        assert_eq!(config.cursor.max_rows, 0);
        assert_eq!(config.default_schema(), None);
        assert_eq!(config.data_source().unwrap().db_type(), "postgres");
    }

    #[test]
    fn test_from_yaml_invalid() {
        assert!(matches!(
            Config::from_yaml("data_source: ["),
            Err(DbError::Yaml(_))
        ));
        assert!(matches!(
            Config::from_yaml("data_source:\n  name: x\n  type: db2\n"),
            Err(DbError::Config(_))
        ));
    }

    #[test]
    fn test_load_missing_file() {
        assert!(matches!(
            Config::load("/nonexistent/dbnav.yaml"),
            Err(DbError::Io(_))
        ));
    }
}
