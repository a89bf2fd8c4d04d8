//! YAML schema snapshots: an offline description of tables, used when no
//! live connection is available.
//!
//! ```yaml
//! tables:
//!   - schema: shop
//!     name: order
//!     columns:
//!       - { name: id, data_type: int }
//!       - { name: customer_id, data_type: int }
//!     foreign_keys:
//!       - name: fk_order_customer
//!         referenced_key: { schema: shop, table: customer, name: PRIMARY }
//!         delete_rule: CASCADE
//!         columns:
//!           - { column: customer_id, referenced_column: id }
//! ```

use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{DbError, Result};

use super::data_source::{Container, DataSource};
use super::foreign_key::{ForeignKey, ForeignKeyColumn};
use super::partition::TablePartition;
use super::table::{Column, Table, UniqueKey};

/// Root of a schema snapshot file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SchemaSnapshot {
    #[serde(default)]
    pub tables: Vec<TableDef>,
}

/// Table entry of a snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableDef {
    #[serde(flatten)]
    pub container: Container,

    pub name: String,

    #[serde(default)]
    pub columns: Vec<Column>,

    #[serde(default)]
    pub unique_keys: Vec<UniqueKey>,

    #[serde(default)]
    pub foreign_keys: Vec<ForeignKey>,

    #[serde(default)]
    pub partitions: Vec<TablePartition>,
}

impl SchemaSnapshot {
    /// Load a snapshot from a YAML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse a snapshot from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Build tables bound to `data_source`.
    ///
    /// Tables without a catalog or schema get `default_schema`. Foreign key
    /// columns are checked against the owning table and for repeated pairs,
    /// and their ordinals follow list order.
    pub fn into_tables(
        self,
        data_source: Arc<DataSource>,
        default_schema: Option<&str>,
    ) -> Result<Vec<Table>> {
        let mut tables = Vec::with_capacity(self.tables.len());

        for def in self.tables {
            let mut container = def.container;
            if container.is_empty() {
                container.schema = default_schema.map(str::to_string);
            }

            let mut table = Table::new(data_source.clone(), container, def.name);
            for column in def.columns {
                table.add_column(column);
            }
            table.unique_keys = def.unique_keys;
            table.partitions = def.partitions;

            for mut fk in def.foreign_keys {
                fk.attach_to(&table.name);
                let columns = fk
                    .column_mappings()
                    .iter()
                    .enumerate()
                    .map(|(i, col)| {
                        table.attribute(col.name())?;
                        Ok(ForeignKeyColumn::new(
                            col.name(),
                            i as u32,
                            col.referenced_column(),
                        ))
                    })
                    .collect::<Result<Vec<_>>>()?;
                fk.set_column_mappings(columns)?;
                table.foreign_keys.push(fk);
            }

            debug!(
                "Loaded table {} ({} columns, {} foreign keys)",
                table.full_name(),
                table.columns.len(),
                table.foreign_keys.len()
            );
            tables.push(table);
        }

        Ok(tables)
    }
}

/// Find a table by `schema.table` or bare `table` name.
pub fn find_table<'a>(tables: &'a [Table], qualified: &str) -> Result<&'a Table> {
    let (schema, name) = match qualified.rsplit_once('.') {
        Some((s, n)) => (Some(s), n),
        None => (None, qualified),
    };
    tables
        .iter()
        .find(|t| {
            t.name == name
                && schema.map_or(true, |s| t.container.schema.as_deref() == Some(s))
        })
        .ok_or_else(|| DbError::resolution("schema snapshot", format!("table {}", qualified)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ModifyRule;

    const YAML: &str = r#"
tables:
  - schema: shop
    name: customer
    columns:
      - { name: id, data_type: int, is_nullable: false }
    unique_keys:
      - { name: PRIMARY, kind: primary, columns: [id] }
  - name: order
    columns:
      - { name: id, data_type: int }
      - { name: customer_id, data_type: int }
    foreign_keys:
      - name: fk_order_customer
        referenced_key: { schema: shop, table: customer, name: PRIMARY }
        delete_rule: CASCADE
        update_rule: set_null
        columns:
          - { column: customer_id, ordinal: 0, referenced_column: id }
"#;

    fn data_source() -> Arc<DataSource> {
        Arc::new(DataSource::from_db_type("local", "mysql").unwrap())
    }

    #[test]
    fn test_load_snapshot() {
        let tables = SchemaSnapshot::from_yaml(YAML)
            .unwrap()
            .into_tables(data_source(), Some("shop"))
            .unwrap();
        assert_eq!(tables.len(), 2);

        let order = find_table(&tables, "shop.order").unwrap();
        assert_eq!(order.columns[1].ordinal_pos, 2);
        let fk = order.foreign_key("fk_order_customer").unwrap();
        assert_eq!(fk.table_name(), "order");
        assert!(fk.is_persisted());
        assert_eq!(fk.delete_rule(), ModifyRule::Cascade);
        assert_eq!(fk.update_rule(), ModifyRule::SetNull);
        assert_eq!(fk.column_mappings().len(), 1);

        let customer = find_table(&tables, "customer").unwrap();
        assert_eq!(customer.primary_key().unwrap().columns, vec!["id"]);
        assert!(!customer.columns[0].is_nullable);
    }

    #[test]
    fn test_unknown_fk_column_rejected() {
        let yaml = r#"
tables:
  - schema: shop
    name: order
    columns: [{ name: id }]
    foreign_keys:
      - name: fk_bad
        columns: [{ column: customer_id, referenced_column: id }]
"#;
        let err = SchemaSnapshot::from_yaml(yaml)
            .unwrap()
            .into_tables(data_source(), None)
            .unwrap_err();
        assert!(matches!(err, DbError::Resolution { .. }));
    }

    #[test]
    fn test_composite_key_ordinals_follow_list_order() {
        let yaml = r#"
tables:
  - schema: shop
    name: order_line
    columns: [{ name: order_id }, { name: line_no }]
    foreign_keys:
      - name: fk_line_parent
        referenced_key: { table: order_line_parent, name: PRIMARY }
        columns:
          - { column: order_id, referenced_column: id }
          - { column: line_no, ordinal: 7, referenced_column: line }
"#;
        let tables = SchemaSnapshot::from_yaml(yaml)
            .unwrap()
            .into_tables(data_source(), None)
            .unwrap();
        let fk = tables[0].foreign_key("fk_line_parent").unwrap();
        let ordinals: Vec<_> = fk
            .column_mappings()
            .iter()
            .map(|c| (c.name(), c.ordinal()))
            .collect();
        assert_eq!(ordinals, vec![("order_id", 0), ("line_no", 1)]);
    }

    #[test]
    fn test_find_table_missing() {
        let tables = SchemaSnapshot::default()
            .into_tables(data_source(), None)
            .unwrap();
        assert!(find_table(&tables, "shop.nothing").is_err());
    }
}
