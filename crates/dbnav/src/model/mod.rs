//! Structural metadata model: data sources, tables, constraints and partitions.
//!
//! Objects compose small capabilities instead of inheriting from a base
//! class: tables implement [`QualifiedName`](crate::core::QualifiedName),
//! foreign keys implement [`SourceAssociation`] so they can be cloned onto
//! other tables, and [`TableTarget`] is the table-or-partition sum type that
//! administrative tools match on.

pub mod data_source;
pub mod foreign_key;
pub mod partition;
pub mod snapshot;
pub mod table;

pub use data_source::{Container, DataSource};
pub use foreign_key::{
    AttributeRef, ConstraintRef, ForeignKey, ForeignKeyColumn, ModifyRule, SourceAssociation,
};
pub use partition::{TablePartition, TableTarget};
pub use snapshot::{find_table, SchemaSnapshot, TableDef};
pub use table::{Column, Table, UniqueKey, UniqueKeyKind};
