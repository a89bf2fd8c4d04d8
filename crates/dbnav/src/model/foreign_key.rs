//! Foreign key constraints and their column mappings.
//!
//! A [`ForeignKey`] is owned by its table and exclusively owns its ordered
//! list of [`ForeignKeyColumn`] mappings. Position in the list defines which
//! local column pairs with which referenced column.
//!
//! Keys come from three places:
//! - built by hand with [`ForeignKey::new`] plus [`ForeignKey::add_column`]
//! - cloned from any [`SourceAssociation`] with [`ForeignKey::copy_from`]
//! - loaded from live driver metadata (`drivers::mysql::load_foreign_keys`)

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::traits::{Dialect, EvaluationContext, QualifiedName};
use crate::error::{DbError, Result};

use super::table::Table;

/// Referential action for ON DELETE / ON UPDATE.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ModifyRule {
    #[default]
    #[serde(rename = "NO ACTION", alias = "no_action")]
    NoAction,
    #[serde(rename = "CASCADE", alias = "cascade")]
    Cascade,
    #[serde(rename = "SET NULL", alias = "set_null")]
    SetNull,
    #[serde(rename = "SET DEFAULT", alias = "set_default")]
    SetDefault,
    #[serde(rename = "RESTRICT", alias = "restrict")]
    Restrict,
}

impl ModifyRule {
    /// Every rule, in the order editors list them.
    pub const ALL: [ModifyRule; 5] = [
        ModifyRule::NoAction,
        ModifyRule::Cascade,
        ModifyRule::SetNull,
        ModifyRule::SetDefault,
        ModifyRule::Restrict,
    ];

    /// SQL keyword text, e.g. `SET NULL`.
    pub fn as_sql(&self) -> &'static str {
        match self {
            ModifyRule::NoAction => "NO ACTION",
            ModifyRule::Cascade => "CASCADE",
            ModifyRule::SetNull => "SET NULL",
            ModifyRule::SetDefault => "SET DEFAULT",
            ModifyRule::Restrict => "RESTRICT",
        }
    }

    /// Map a JDBC `DatabaseMetaData.importedKey*` code.
    pub fn from_jdbc_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(ModifyRule::Cascade),
            1 => Some(ModifyRule::Restrict),
            2 => Some(ModifyRule::SetNull),
            3 => Some(ModifyRule::NoAction),
            4 => Some(ModifyRule::SetDefault),
            _ => None,
        }
    }
}

impl fmt::Display for ModifyRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

impl FromStr for ModifyRule {
    type Err = DbError;

    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().replace('_', " ").to_uppercase();
        ModifyRule::ALL
            .into_iter()
            .find(|r| r.as_sql() == normalized)
            .ok_or_else(|| DbError::Config(format!("Unknown foreign key rule: '{}'", s)))
    }
}

/// One local-to-referenced column pair of a foreign key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForeignKeyColumn {
    /// Local column name.
    column: String,

    /// Position within the key. Snapshot loading renumbers it from list order.
    #[serde(default)]
    ordinal: u32,

    /// Referenced column name.
    referenced_column: String,
}

impl ForeignKeyColumn {
    pub fn new(column: impl Into<String>, ordinal: u32, referenced_column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            ordinal,
            referenced_column: referenced_column.into(),
        }
    }

    /// Local column name.
    pub fn name(&self) -> &str {
        &self.column
    }

    pub fn ordinal(&self) -> u32 {
        self.ordinal
    }

    /// Referenced column name.
    pub fn referenced_column(&self) -> &str {
        &self.referenced_column
    }

    fn same_pair(&self, other: &ForeignKeyColumn) -> bool {
        self.column == other.column && self.referenced_column == other.referenced_column
    }
}

/// The unique or primary key a foreign key points at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConstraintRef {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,

    pub table: String,

    pub name: String,
}

impl ConstraintRef {
    pub fn new(schema: Option<String>, table: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            schema,
            table: table.into(),
            name: name.into(),
        }
    }
}

/// A column reference exposed by a source association.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttributeRef<'a> {
    /// Local column name.
    pub name: &'a str,

    /// Referenced column name; `None` for plain key columns.
    pub referenced: Option<&'a str>,
}

/// Any relational association a foreign key can be cloned from.
pub trait SourceAssociation {
    fn name(&self) -> &str;

    fn remarks(&self) -> Option<&str> {
        None
    }

    fn referenced_constraint(&self) -> Option<&ConstraintRef>;

    fn delete_rule(&self) -> ModifyRule {
        ModifyRule::NoAction
    }

    fn update_rule(&self) -> ModifyRule {
        ModifyRule::NoAction
    }

    /// Column references in key order, or `None` if the association does
    /// not expose them.
    fn attribute_references(&self) -> Option<Vec<AttributeRef<'_>>> {
        None
    }
}

/// Foreign key constraint metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForeignKey {
    name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    remarks: Option<String>,

    /// Owning table name; filled in when the key is attached to a table.
    #[serde(default)]
    table: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    referenced_key: Option<ConstraintRef>,

    #[serde(default)]
    delete_rule: ModifyRule,

    #[serde(default)]
    update_rule: ModifyRule,

    #[serde(default = "default_persisted")]
    persisted: bool,

    #[serde(default)]
    columns: Vec<ForeignKeyColumn>,
}

fn default_persisted() -> bool {
    true
}

impl ForeignKey {
    /// Create a key with no column mappings.
    pub fn new(
        table: &Table,
        name: impl Into<String>,
        remarks: Option<String>,
        referenced_key: Option<ConstraintRef>,
        delete_rule: ModifyRule,
        update_rule: ModifyRule,
        persisted: bool,
    ) -> Self {
        Self {
            name: name.into(),
            remarks,
            table: table.name.clone(),
            referenced_key,
            delete_rule,
            update_rule,
            persisted,
            columns: Vec::new(),
        }
    }

    /// Clone `source` onto `table`.
    ///
    /// The copy is not persisted. When the source exposes attribute
    /// references, every reference that names a referenced column is
    /// resolved by name on `table` (both sides) and appended at the next
    /// ordinal.
    ///
    /// # Errors
    ///
    /// Returns `DbError::Resolution` if a named column is missing on `table`.
    pub fn copy_from(source: &dyn SourceAssociation, table: &Table) -> Result<Self> {
        let mut fk = Self::new(
            table,
            source.name(),
            source.remarks().map(str::to_string),
            source.referenced_constraint().cloned(),
            source.delete_rule(),
            source.update_rule(),
            false,
        );

        if let Some(refs) = source.attribute_references() {
            fk.columns.reserve(refs.len());
            for attr in refs {
                let Some(referenced) = attr.referenced else {
                    continue;
                };
                let local = table.attribute(attr.name)?;
                let remote = table.attribute(referenced)?;
                let ordinal = fk.columns.len() as u32;
                fk.add_column(ForeignKeyColumn::new(&local.name, ordinal, &remote.name))?;
            }
        }

        debug!(
            "Copied foreign key {} onto {} with {} column(s)",
            fk.name,
            table.full_name(),
            fk.columns.len()
        );
        Ok(fk)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn remarks(&self) -> Option<&str> {
        self.remarks.as_deref()
    }

    pub fn set_remarks(&mut self, remarks: Option<String>) {
        self.remarks = remarks;
    }

    /// Name of the owning table.
    pub fn table_name(&self) -> &str {
        &self.table
    }

    pub(crate) fn attach_to(&mut self, table_name: &str) {
        self.table = table_name.to_string();
    }

    pub fn referenced_key(&self) -> Option<&ConstraintRef> {
        self.referenced_key.as_ref()
    }

    pub fn delete_rule(&self) -> ModifyRule {
        self.delete_rule
    }

    /// Change the ON DELETE rule. Persisting the change is up to the caller.
    pub fn set_delete_rule(&mut self, rule: ModifyRule) {
        self.delete_rule = rule;
    }

    pub fn update_rule(&self) -> ModifyRule {
        self.update_rule
    }

    /// Change the ON UPDATE rule. Persisting the change is up to the caller.
    pub fn set_update_rule(&mut self, rule: ModifyRule) {
        self.update_rule = rule;
    }

    pub fn is_persisted(&self) -> bool {
        self.persisted
    }

    pub fn set_persisted(&mut self, persisted: bool) {
        self.persisted = persisted;
    }

    /// Column mappings in key order.
    pub fn column_mappings(&self) -> &[ForeignKeyColumn] {
        &self.columns
    }

    /// Replace all column mappings with `columns`, in the given order.
    ///
    /// # Errors
    ///
    /// Returns `DbError::DuplicateColumnMapping` if `columns` repeats a
    /// (local, referenced) pair; the current mappings are kept in that case.
    pub fn set_column_mappings(&mut self, columns: Vec<ForeignKeyColumn>) -> Result<()> {
        for (i, col) in columns.iter().enumerate() {
            if columns[..i].iter().any(|c| c.same_pair(col)) {
                return Err(self.duplicate(col));
            }
        }
        self.columns = columns;
        Ok(())
    }

    /// Append a column mapping.
    ///
    /// # Errors
    ///
    /// Returns `DbError::DuplicateColumnMapping` if the pair already exists.
    pub fn add_column(&mut self, column: ForeignKeyColumn) -> Result<()> {
        if self.has_column(&column) {
            return Err(self.duplicate(&column));
        }
        self.columns.push(column);
        Ok(())
    }

    /// Remove every column mapping.
    pub fn clear_column_mappings(&mut self) {
        self.columns.clear();
    }

    /// Whether a mapping with the same local and referenced column names
    /// exists, regardless of ordinal.
    pub fn has_column(&self, column: &ForeignKeyColumn) -> bool {
        self.columns.iter().any(|c| c.same_pair(column))
    }

    fn duplicate(&self, column: &ForeignKeyColumn) -> DbError {
        DbError::DuplicateColumnMapping {
            constraint: self.name.clone(),
            column: column.column.clone(),
            referenced: column.referenced_column.clone(),
        }
    }

    fn check_owner(&self, table: &Table) -> Result<()> {
        if self.table != table.name {
            return Err(DbError::QualifiedName(format!(
                "foreign key {} belongs to table {}, not {}",
                self.name, self.table, table.name
            )));
        }
        Ok(())
    }

    /// Fully qualified constraint name: container, table, constraint.
    ///
    /// # Errors
    ///
    /// Returns `DbError::QualifiedName` if `table` does not own this key or
    /// has no container, and `DbError::Config` for invalid identifiers.
    pub fn qualified_name(&self, table: &Table, ctx: EvaluationContext) -> Result<String> {
        self.check_owner(table)?;
        let mut parts = table.name_parts()?;
        parts.push(&self.name);
        table.data_source.dialect.qualify(&parts, ctx)
    }

    /// `ALTER TABLE ... ADD CONSTRAINT ... FOREIGN KEY` statement for this key.
    ///
    /// `NO ACTION` rules are left implicit.
    pub fn ddl(&self, table: &Table) -> Result<String> {
        self.check_owner(table)?;
        let referenced = self.referenced_key.as_ref().ok_or_else(|| {
            DbError::QualifiedName(format!("foreign key {} has no referenced key", self.name))
        })?;
        if self.columns.is_empty() {
            return Err(DbError::resolution(
                format!("foreign key {}", self.name),
                "column mappings",
            ));
        }

        let dialect = &table.data_source.dialect;
        let local_cols = self
            .columns
            .iter()
            .map(|c| dialect.quote_ident_if_needed(&c.column))
            .collect::<Result<Vec<_>>>()?
            .join(", ");
        let ref_cols = self
            .columns
            .iter()
            .map(|c| dialect.quote_ident_if_needed(&c.referenced_column))
            .collect::<Result<Vec<_>>>()?
            .join(", ");

        let mut ref_parts: Vec<&str> = referenced.schema.iter().map(String::as_str).collect();
        ref_parts.push(&referenced.table);

        let mut sql = format!(
            "ALTER TABLE {} ADD CONSTRAINT {} FOREIGN KEY ({}) REFERENCES {} ({})",
            table.qualified_name(EvaluationContext::Ddl)?,
            dialect.quote_ident_if_needed(&self.name)?,
            local_cols,
            dialect.qualify(&ref_parts, EvaluationContext::Ddl)?,
            ref_cols
        );
        if self.delete_rule != ModifyRule::NoAction {
            sql.push_str(&format!(" ON DELETE {}", self.delete_rule));
        }
        if self.update_rule != ModifyRule::NoAction {
            sql.push_str(&format!(" ON UPDATE {}", self.update_rule));
        }
        Ok(sql)
    }
}

impl SourceAssociation for ForeignKey {
    fn name(&self) -> &str {
        &self.name
    }

    fn remarks(&self) -> Option<&str> {
        self.remarks.as_deref()
    }

    fn referenced_constraint(&self) -> Option<&ConstraintRef> {
        self.referenced_key.as_ref()
    }

    fn delete_rule(&self) -> ModifyRule {
        self.delete_rule
    }

    fn update_rule(&self) -> ModifyRule {
        self.update_rule
    }

    fn attribute_references(&self) -> Option<Vec<AttributeRef<'_>>> {
        Some(
            self.columns
                .iter()
                .map(|c| AttributeRef {
                    name: &c.column,
                    referenced: Some(&c.referenced_column),
                })
                .collect(),
        )
    }
}
