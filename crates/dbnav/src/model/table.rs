//! Table, column and unique key metadata.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::core::traits::{Dialect, EvaluationContext, QualifiedName};
use crate::error::{DbError, Result};

use super::data_source::{Container, DataSource};
use super::foreign_key::ForeignKey;
use super::partition::{TablePartition, TableTarget};

/// Column metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    /// Column name.
    pub name: String,

    /// Data type as reported by the driver (e.g., "NUMBER", "varchar").
    #[serde(default)]
    pub data_type: String,

    /// Ordinal position (1-based).
    #[serde(default)]
    pub ordinal_pos: u32,

    /// Whether the column allows NULL.
    #[serde(default = "default_true")]
    pub is_nullable: bool,
}

fn default_true() -> bool {
    true
}

impl Column {
    /// Create a nullable column with the given type.
    pub fn new(name: impl Into<String>, data_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data_type: data_type.into(),
            ordinal_pos: 0,
            is_nullable: true,
        }
    }
}

/// Kind of a unique constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UniqueKeyKind {
    Primary,
    Unique,
}

/// Primary key or unique constraint metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UniqueKey {
    /// Constraint name.
    pub name: String,

    /// Primary or unique.
    pub kind: UniqueKeyKind,

    /// Key column names in key order.
    pub columns: Vec<String>,
}

/// Table metadata.
///
/// A table exclusively owns its columns, constraints and partitions. The
/// data source is shared with every other table of the same connection.
#[derive(Debug, Clone)]
pub struct Table {
    /// Connection the table belongs to.
    pub data_source: Arc<DataSource>,

    /// Catalog/schema holding the table.
    pub container: Container,

    /// Table name.
    pub name: String,

    /// Column definitions in ordinal order.
    pub columns: Vec<Column>,

    /// Primary key and unique constraints.
    pub unique_keys: Vec<UniqueKey>,

    /// Foreign key constraints.
    pub foreign_keys: Vec<ForeignKey>,

    /// Partitions and sub-partitions.
    pub partitions: Vec<TablePartition>,
}

impl Table {
    /// Create an empty table.
    pub fn new(data_source: Arc<DataSource>, container: Container, name: impl Into<String>) -> Self {
        Self {
            data_source,
            container,
            name: name.into(),
            columns: Vec::new(),
            unique_keys: Vec::new(),
            foreign_keys: Vec::new(),
            partitions: Vec::new(),
        }
    }

    /// Append a column, assigning the next ordinal position when unset.
    pub fn add_column(&mut self, mut column: Column) {
        if column.ordinal_pos == 0 {
            column.ordinal_pos = self.columns.len() as u32 + 1;
        }
        self.columns.push(column);
    }

    /// Builder form of [`Table::add_column`].
    pub fn with_column(mut self, column: Column) -> Self {
        self.add_column(column);
        self
    }

    /// Display name, `schema.table` or just `table`.
    pub fn full_name(&self) -> String {
        let mut parts = self.container.parts();
        parts.push(&self.name);
        parts.join(".")
    }

    /// Look up a column by name.
    ///
    /// Exact matches win; otherwise the first ASCII case-insensitive match is
    /// returned, since drivers disagree on identifier case.
    ///
    /// # Errors
    ///
    /// Returns `DbError::Resolution` if no column matches.
    pub fn attribute(&self, name: &str) -> Result<&Column> {
        self.columns
            .iter()
            .find(|c| c.name == name)
            .or_else(|| self.columns.iter().find(|c| c.name.eq_ignore_ascii_case(name)))
            .ok_or_else(|| {
                DbError::resolution(format!("table {}", self.full_name()), format!("column {}", name))
            })
    }

    /// Find a foreign key by name.
    pub fn foreign_key(&self, name: &str) -> Option<&ForeignKey> {
        self.foreign_keys.iter().find(|fk| fk.name() == name)
    }

    /// Find a foreign key by name for editing.
    pub fn foreign_key_mut(&mut self, name: &str) -> Option<&mut ForeignKey> {
        self.foreign_keys.iter_mut().find(|fk| fk.name() == name)
    }

    /// Find a primary key or unique constraint by name.
    pub fn unique_key(&self, name: &str) -> Option<&UniqueKey> {
        self.unique_keys.iter().find(|k| k.name == name)
    }

    /// The primary key, if any.
    pub fn primary_key(&self) -> Option<&UniqueKey> {
        self.unique_keys
            .iter()
            .find(|k| k.kind == UniqueKeyKind::Primary)
    }

    /// This table as a tool target.
    pub fn as_target(&self) -> TableTarget<'_> {
        TableTarget::Table(self)
    }

    /// One of this table's partitions as a tool target.
    ///
    /// # Errors
    ///
    /// Returns `DbError::Resolution` if the partition does not exist.
    pub fn partition_target(&self, name: &str) -> Result<TableTarget<'_>> {
        let partition = self
            .partitions
            .iter()
            .find(|p| p.name == name)
            .ok_or_else(|| {
                DbError::resolution(format!("table {}", self.full_name()), format!("partition {}", name))
            })?;
        Ok(TableTarget::Partition {
            parent: self,
            partition,
        })
    }

    /// Name parts from the container down to the table, for qualification.
    pub(crate) fn name_parts(&self) -> Result<Vec<&str>> {
        if self.container.is_empty() {
            return Err(DbError::QualifiedName(format!(
                "table {} has no catalog or schema",
                self.name
            )));
        }
        let mut parts = self.container.parts();
        parts.push(&self.name);
        Ok(parts)
    }
}

impl QualifiedName for Table {
    fn qualified_name(&self, ctx: EvaluationContext) -> Result<String> {
        self.data_source.dialect.qualify(&self.name_parts()?, ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drivers::{DialectImpl, OracleDialect};

    fn oracle_table(name: &str) -> Table {
        let ds = Arc::new(DataSource::new(
            "prod",
            DialectImpl::Oracle(OracleDialect::new()),
        ));
        Table::new(ds, Container::schema("HR"), name)
            .with_column(Column::new("EMPLOYEE_ID", "NUMBER"))
            .with_column(Column::new("Dept_Id", "NUMBER"))
    }

    #[test]
    fn test_add_column_assigns_ordinals() {
        let table = oracle_table("EMPLOYEES");
        assert_eq!(table.columns[0].ordinal_pos, 1);
        assert_eq!(table.columns[1].ordinal_pos, 2);
    }

    #[test]
    fn test_attribute_lookup() {
        let table = oracle_table("EMPLOYEES");
        assert_eq!(table.attribute("EMPLOYEE_ID").unwrap().name, "EMPLOYEE_ID");
        assert_eq!(table.attribute("DEPT_ID").unwrap().name, "Dept_Id");

        let err = table.attribute("SALARY").unwrap_err();
        assert!(matches!(err, DbError::Resolution { .. }));
        assert!(err.to_string().contains("column SALARY"));
    }

    #[test]
    fn test_qualified_name_contexts() {
        let table = oracle_table("Employees");
        assert_eq!(
            table.qualified_name(EvaluationContext::Ddl).unwrap(),
            "HR.\"Employees\""
        );
        assert_eq!(
            table.qualified_name(EvaluationContext::Ui).unwrap(),
            "HR.Employees"
        );
    }

    #[test]
    fn test_qualified_name_requires_container() {
        let mut table = oracle_table("EMPLOYEES");
        table.container = Container::default();
        let err = table.qualified_name(EvaluationContext::Ddl).unwrap_err();
        assert!(matches!(err, DbError::QualifiedName(_)));
    }

    #[test]
    fn test_partition_target_missing() {
        let table = oracle_table("EMPLOYEES");
        assert!(table.partition_target("P1").is_err());
        assert!(matches!(table.as_target(), TableTarget::Table(_)));
    }
}
