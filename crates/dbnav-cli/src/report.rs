//! Printable and JSON-serializable command results.

use dbnav::{DbError, EvaluationContext, ForeignKey, Table};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct TruncateReport {
    pub target: String,
    pub statements: Vec<String>,
    pub needs_refresh: bool,
}

impl TruncateReport {
    pub fn print(&self) {
        for sql in &self.statements {
            println!("{};", sql);
        }
        if self.needs_refresh {
            println!("-- refresh {} after execution", self.target);
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ColumnPair {
    pub column: String,
    pub referenced_column: String,
}

#[derive(Debug, Serialize)]
pub struct ForeignKeyReport {
    pub name: String,
    pub qualified_name: String,
    pub referenced_table: Option<String>,
    pub delete_rule: String,
    pub update_rule: String,
    pub columns: Vec<ColumnPair>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ddl: Option<String>,
}

impl ForeignKeyReport {
    pub fn new(fk: &ForeignKey, table: &Table, with_ddl: bool) -> Result<Self, DbError> {
        Ok(Self {
            name: fk.name().to_string(),
            qualified_name: fk.qualified_name(table, EvaluationContext::Ui)?,
            referenced_table: fk.referenced_key().map(|r| match &r.schema {
                Some(schema) => format!("{}.{}", schema, r.table),
                None => r.table.clone(),
            }),
            delete_rule: fk.delete_rule().to_string(),
            update_rule: fk.update_rule().to_string(),
            columns: fk
                .column_mappings()
                .iter()
                .map(|c| ColumnPair {
                    column: c.name().to_string(),
                    referenced_column: c.referenced_column().to_string(),
                })
                .collect(),
            ddl: if with_ddl { Some(fk.ddl(table)?) } else { None },
        })
    }

    pub fn print(&self) {
        println!("{}", self.qualified_name);
        if let Some(referenced) = &self.referenced_table {
            println!("  references: {}", referenced);
        }
        println!("  on delete: {}", self.delete_rule);
        println!("  on update: {}", self.update_rule);
        for pair in &self.columns {
            println!("  {} -> {}", pair.column, pair.referenced_column);
        }
        if let Some(ddl) = &self.ddl {
            println!("  {};", ddl);
        }
    }
}
