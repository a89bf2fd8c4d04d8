//! Data source and container handles used for qualified naming.

use serde::{Deserialize, Serialize};

use crate::core::traits::Dialect;
use crate::drivers::DialectImpl;
use crate::error::Result;

/// A configured database connection target, reduced to what naming needs.
#[derive(Debug, Clone)]
pub struct DataSource {
    /// Display name of the connection.
    pub name: String,

    /// SQL dialect of the server.
    pub dialect: DialectImpl,
}

impl DataSource {
    /// Create a data source with an explicit dialect.
    pub fn new(name: impl Into<String>, dialect: DialectImpl) -> Self {
        Self {
            name: name.into(),
            dialect,
        }
    }

    /// Create a data source from a database type string ("oracle", "mysql", ...).
    pub fn from_db_type(name: impl Into<String>, db_type: &str) -> Result<Self> {
        Ok(Self::new(name, DialectImpl::from_db_type(db_type)?))
    }

    /// Dialect identifier, e.g. "oracle".
    pub fn db_type(&self) -> &str {
        self.dialect.name()
    }
}

/// Catalog/schema pair that owns a table. Either part may be absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Container {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub catalog: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,
}

impl Container {
    /// Container with only a schema, the common case.
    pub fn schema(schema: impl Into<String>) -> Self {
        Self {
            catalog: None,
            schema: Some(schema.into()),
        }
    }

    /// Whether neither catalog nor schema is set.
    pub fn is_empty(&self) -> bool {
        self.catalog.is_none() && self.schema.is_none()
    }

    /// Name parts from outermost to innermost.
    pub fn parts(&self) -> Vec<&str> {
        self.catalog
            .iter()
            .chain(self.schema.iter())
            .map(String::as_str)
            .collect()
    }
}
