//! Table partitions and the table-or-partition target used by tools.

use serde::{Deserialize, Serialize};

use crate::core::traits::{Dialect, EvaluationContext, QualifiedName};
use crate::error::Result;

use super::table::Table;

/// Partition or sub-partition of a table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TablePartition {
    /// Partition name.
    pub name: String,

    /// For sub-partitions, the partition they belong to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_partition: Option<String>,

    /// Whether this is a sub-partition.
    #[serde(default)]
    pub is_sub_partition: bool,

    /// Partition bound expression (`VALUES LESS THAN (...)`), if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub high_value: Option<String>,
}

impl TablePartition {
    /// Top-level partition.
    pub fn partition(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parent_partition: None,
            is_sub_partition: false,
            high_value: None,
        }
    }

    /// Sub-partition of `parent_partition`.
    pub fn sub_partition(name: impl Into<String>, parent_partition: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parent_partition: Some(parent_partition.into()),
            is_sub_partition: true,
            high_value: None,
        }
    }
}

/// A table or one of its partitions, as accepted by administrative tools.
#[derive(Debug, Clone, Copy)]
pub enum TableTarget<'a> {
    Table(&'a Table),
    Partition {
        parent: &'a Table,
        partition: &'a TablePartition,
    },
}

impl<'a> TableTarget<'a> {
    /// Object name (table or partition name).
    pub fn name(&self) -> &'a str {
        match self {
            TableTarget::Table(t) => &t.name,
            TableTarget::Partition { partition, .. } => &partition.name,
        }
    }

    /// The table itself, or the partition's parent table.
    pub fn table(&self) -> &'a Table {
        match self {
            TableTarget::Table(t) => t,
            TableTarget::Partition { parent, .. } => parent,
        }
    }
}

impl QualifiedName for TableTarget<'_> {
    /// Partitions are not schema objects, so they qualify as
    /// `<table qualified name>.<partition>`.
    fn qualified_name(&self, ctx: EvaluationContext) -> Result<String> {
        match self {
            TableTarget::Table(t) => t.qualified_name(ctx),
            TableTarget::Partition { parent, partition } => {
                let mut parts = parent.name_parts()?;
                parts.push(&partition.name);
                parent.data_source.dialect.qualify(&parts, ctx)
            }
        }
    }
}
