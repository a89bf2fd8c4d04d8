//! Foreign key loading from live MySQL metadata.

use tracing::debug;

use crate::core::value::{Row, SqlValue};
use crate::cursor::{NativeResultSet, RowCursor};
use crate::error::{DbError, Result};
use crate::model::{ConstraintRef, ForeignKey, ForeignKeyColumn, ModifyRule, Table};

const COL_CONSTRAINT: usize = 0;
const COL_COLUMN: usize = 1;
const COL_REF_SCHEMA: usize = 2;
const COL_REF_TABLE: usize = 3;
const COL_REF_COLUMN: usize = 4;
const COL_REF_CONSTRAINT: usize = 5;
const COL_DELETE_RULE: usize = 6;
const COL_UPDATE_RULE: usize = 7;
const EXPECTED_COLUMNS: usize = 8;

/// Build the foreign keys of `table` from a cursor over
/// [`MysqlDialect::foreign_keys_query`](super::MysqlDialect::foreign_keys_query).
///
/// Rows are grouped by constraint name in first-seen order; within a key,
/// row order defines column order. Repeated (column, referenced column)
/// rows are skipped. The cursor is closed on every path.
///
/// # Errors
///
/// Returns `DbError::Cursor` for malformed rows, `DbError::Resolution` if a
/// local column is not on `table`, or the driver's fetch/close error.
pub fn load_foreign_keys<R: NativeResultSet>(
    mut cursor: RowCursor<R>,
    table: &Table,
) -> Result<Vec<ForeignKey>> {
    if cursor.column_names().len() < EXPECTED_COLUMNS {
        return Err(DbError::Cursor(format!(
            "foreign key metadata needs {} columns, got {}",
            EXPECTED_COLUMNS,
            cursor.column_names().len()
        )));
    }

    let mut keys: Vec<ForeignKey> = Vec::new();

    while let Some(row) = cursor.next_row()? {
        let name = text(&row, COL_CONSTRAINT)?;
        let idx = match keys.iter().position(|fk| fk.name() == name) {
            Some(idx) => idx,
            None => {
                let referenced = ConstraintRef::new(
                    opt_text(&row, COL_REF_SCHEMA)?.map(str::to_string),
                    text(&row, COL_REF_TABLE)?,
                    opt_text(&row, COL_REF_CONSTRAINT)?.unwrap_or("PRIMARY"),
                );
                keys.push(ForeignKey::new(
                    table,
                    name,
                    None,
                    Some(referenced),
                    rule(&row, COL_DELETE_RULE)?,
                    rule(&row, COL_UPDATE_RULE)?,
                    true,
                ));
                keys.len() - 1
            }
        };

        let fk = &mut keys[idx];
        let local = table.attribute(text(&row, COL_COLUMN)?)?;
        let column = ForeignKeyColumn::new(
            &local.name,
            fk.column_mappings().len() as u32,
            text(&row, COL_REF_COLUMN)?,
        );
        if !fk.has_column(&column) {
            fk.add_column(column)?;
        }
    }

    cursor.close()?;

    debug!(
        "Loaded {} foreign keys for {}",
        keys.len(),
        table.full_name()
    );
    Ok(keys)
}

fn opt_text(row: &Row, idx: usize) -> Result<Option<&str>> {
    match row.get(idx) {
        Some(SqlValue::Text(s)) => Ok(Some(s.as_str())),
        Some(SqlValue::Null) => Ok(None),
        Some(other) => Err(DbError::Cursor(format!(
            "expected text in column {}, got {:?}",
            idx, other
        ))),
        None => Err(DbError::Cursor(format!("row has no column {}", idx))),
    }
}

fn text(row: &Row, idx: usize) -> Result<&str> {
    opt_text(row, idx)?
        .ok_or_else(|| DbError::Cursor(format!("unexpected NULL in column {}", idx)))
}

fn rule(row: &Row, idx: usize) -> Result<ModifyRule> {
    match row.get(idx) {
        Some(SqlValue::I64(code)) => ModifyRule::from_jdbc_code(*code).ok_or_else(|| {
            DbError::Cursor(format!("unknown referential action code {}", code))
        }),
        Some(SqlValue::Null) => Ok(ModifyRule::NoAction),
        _ => text(row, idx)?.parse(),
    }
}
