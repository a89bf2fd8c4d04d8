//! # dbnav
//!
//! Database access facade for schema tooling.
//!
//! This library provides the metadata and statement-generation core used by
//! database navigator tools, with support for:
//!
//! - **Foreign key metadata** with column mappings, referential rules and
//!   qualified names, loaded from YAML snapshots or live MySQL metadata
//! - **Administrative tools** that generate SQL without executing it, such
//!   as Oracle table and partition truncation
//! - **Row cursors** wrapping native driver result sets with row caps and
//!   guaranteed release
//!
//! ## Example
//!
//! ```rust,no_run
//! use dbnav::{Config, OracleTruncateTable, SchemaSnapshot, SqlToolHandler, ToolSession};
//!
//! fn main() -> dbnav::Result<()> {
//!     let config = Config::load("config.yaml")?;
//!     let data_source = config.data_source()?;
//!     let tables = SchemaSnapshot::load("schema.yaml")?
//!         .into_tables(data_source.clone(), config.default_schema())?;
//!
//!     let session = ToolSession::new(data_source, "truncate");
//!     let mut queries = Vec::new();
//!     OracleTruncateTable::new().generate_statements(
//!         &session,
//!         &config.tools.truncate,
//!         tables[0].as_target(),
//!         &mut queries,
//!     )?;
//!     println!("{}", queries[0].sql);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod core;
pub mod cursor;
pub mod drivers;
pub mod error;
pub mod model;
pub mod tools;

// Re-exports for convenient access
pub use crate::core::{Dialect, EvaluationContext, QualifiedName, Row, SqlValue};
pub use config::{Config, CursorConfig, DataSourceConfig, ToolsConfig};
pub use cursor::{MemoryResultSet, NativeResultSet, RowCursor, Statement};
pub use drivers::mysql::load_foreign_keys;
pub use drivers::oracle::{OracleTruncateTable, TruncateSettings};
pub use drivers::{DialectImpl, MysqlDialect, OracleDialect, PostgresDialect};
pub use error::{DbError, Result};
pub use model::{
    find_table, Column, ConstraintRef, Container, DataSource, ForeignKey, ForeignKeyColumn,
    ModifyRule, SchemaSnapshot, SourceAssociation, Table, TablePartition, TableTarget,
};
pub use tools::{plan_tool, ActionKind, PersistAction, SqlToolHandler, ToolPlan, ToolSession};
