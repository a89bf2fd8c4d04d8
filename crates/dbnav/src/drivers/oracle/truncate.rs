//! `TRUNCATE` statement generation for Oracle tables and partitions.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::traits::{Dialect, EvaluationContext, QualifiedName};
use crate::error::{DbError, Result};
use crate::model::TableTarget;
use crate::tools::{PersistAction, SqlToolHandler, ToolSession};

/// Options of the truncate tool.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TruncateSettings {
    /// Keep the deallocated extents allocated to the segment.
    #[serde(default)]
    pub reuse_storage: bool,
}

/// Truncate handler for Oracle.
///
/// Tables produce `TRUNCATE TABLE <name>`; partitions produce
/// `ALTER TABLE <parent> TRUNCATE [SUB]PARTITION <name>`.
#[derive(Debug, Clone, Copy, Default)]
pub struct OracleTruncateTable;

impl OracleTruncateTable {
    pub fn new() -> Self {
        Self
    }
}

impl SqlToolHandler for OracleTruncateTable {
    type Settings = TruncateSettings;

    fn create_settings(&self) -> TruncateSettings {
        TruncateSettings::default()
    }

    fn generate_statements(
        &self,
        session: &ToolSession,
        settings: &TruncateSettings,
        target: TableTarget<'_>,
        queries: &mut Vec<PersistAction>,
    ) -> Result<()> {
        let data_source = &target.table().data_source;
        if data_source.db_type() != "oracle" {
            return Err(DbError::Config(format!(
                "{} tool requires an Oracle data source, '{}' is {}",
                session.label,
                data_source.name,
                data_source.db_type()
            )));
        }

        let mut sql = match target {
            TableTarget::Table(table) => {
                format!("TRUNCATE TABLE {}", table.qualified_name(EvaluationContext::Ddl)?)
            }
            TableTarget::Partition { parent, partition } => format!(
                "ALTER TABLE {} TRUNCATE {}PARTITION {}",
                parent.qualified_name(EvaluationContext::Ddl)?,
                if partition.is_sub_partition { "SUB" } else { "" },
                data_source.dialect.quote_ident_if_needed(&partition.name)?
            ),
        };
        if settings.reuse_storage {
            sql.push_str(" REUSE STORAGE");
        }

        debug!("Generated: {}", sql);
        queries.push(PersistAction::maintenance(sql));
        Ok(())
    }

    fn needs_refresh_on_finish(&self) -> bool {
        true
    }
}
