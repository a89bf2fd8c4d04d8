//! Configuration type definitions.

use serde::{Deserialize, Serialize};

use crate::drivers::oracle::TruncateSettings;

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Connection the tools operate on.
    pub data_source: DataSourceConfig,

    /// Per-tool default settings.
    #[serde(default)]
    pub tools: ToolsConfig,

    /// Row cursor behavior.
    #[serde(default)]
    pub cursor: CursorConfig,
}

/// Data source configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataSourceConfig {
    /// Display name of the connection.
    pub name: String,

    /// Database type: "mysql", "oracle" or "postgres".
    pub r#type: String,

    /// Default schema for unqualified table names.
    #[serde(default)]
    pub schema: Option<String>,
}

/// Default settings for administrative tools.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ToolsConfig {
    #[serde(default)]
    pub truncate: TruncateSettings,
}

/// Row cursor configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CursorConfig {
    /// Maximum rows returned per cursor (0 = unlimited).
    #[serde(default)]
    pub max_rows: u64,
}
