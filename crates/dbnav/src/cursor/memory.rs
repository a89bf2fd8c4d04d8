//! In-process result set backed by a vector of rows.
//!
//! Replays result sets captured from a live server (see
//! [`MemoryResultSet::from_json`]) and stands in for a driver cursor in
//! tests, where it can simulate fetch and close failures.

use std::cell::Cell;
use std::collections::VecDeque;
use std::path::Path;
use std::rc::Rc;

use serde::Deserialize;
use serde_json::Value;

use crate::core::value::{Row, SqlValue};
use crate::error::{DbError, Result};

use super::NativeResultSet;

/// A result set captured as JSON: `{"columns": [...], "rows": [[...], ...]}`.
///
/// Cells map by JSON type alone: strings are text, whole numbers are
/// integers, other numbers are floats.
#[derive(Debug, Deserialize)]
struct CapturedResult {
    columns: Vec<String>,
    #[serde(default)]
    rows: Vec<Vec<Value>>,
}

fn captured_cell(row: usize, value: Value) -> Result<SqlValue> {
    match value {
        Value::Null => Ok(SqlValue::Null),
        Value::Bool(b) => Ok(SqlValue::Bool(b)),
        Value::String(s) => Ok(SqlValue::Text(s)),
        Value::Number(n) => match (n.as_i64(), n.as_f64()) {
            (Some(i), _) => Ok(SqlValue::I64(i)),
            (None, Some(f)) => Ok(SqlValue::F64(f)),
            (None, None) => Err(DbError::driver(
                format!("row {}: unsupported number {}", row, n),
                "replaying captured result set",
            )),
        },
        other => Err(DbError::driver(
            format!("row {}: unsupported cell {}", row, other),
            "replaying captured result set",
        )),
    }
}

#[derive(Debug)]
pub struct MemoryResultSet {
    columns: Vec<String>,
    rows: VecDeque<Row>,
    fetch_limit: Option<u64>,
    served: u64,
    fail_after: Option<(u64, String)>,
    fail_on_close: Option<String>,
    closes: Rc<Cell<usize>>,
}

impl MemoryResultSet {
    pub fn new(columns: Vec<String>, rows: Vec<Row>) -> Self {
        Self {
            columns,
            rows: rows.into(),
            fetch_limit: None,
            served: 0,
            fail_after: None,
            fail_on_close: None,
            closes: Rc::new(Cell::new(0)),
        }
    }

    /// Parse a captured result set.
    ///
    /// # Errors
    ///
    /// Returns `DbError::Json` for malformed input, or `DbError::Driver` if a
    /// row's width differs from the column count or a cell is an array or
    /// object.
    pub fn from_json(json: &str) -> Result<Self> {
        let captured: CapturedResult = serde_json::from_str(json)?;
        if let Some((idx, row)) = captured
            .rows
            .iter()
            .enumerate()
            .find(|(_, row)| row.len() != captured.columns.len())
        {
            return Err(DbError::driver(
                format!(
                    "row {} has {} values, expected {}",
                    idx,
                    row.len(),
                    captured.columns.len()
                ),
                "replaying captured result set",
            ));
        }
        let rows = captured
            .rows
            .into_iter()
            .enumerate()
            .map(|(idx, row)| {
                row.into_iter()
                    .map(|cell| captured_cell(idx, cell))
                    .collect::<Result<Row>>()
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::new(captured.columns, rows))
    }

    /// Load a captured result set from a JSON file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Fail the fetch that follows `rows` successful fetches.
    pub fn fail_after(mut self, rows: u64, message: impl Into<String>) -> Self {
        self.fail_after = Some((rows, message.into()));
        self
    }

    /// Fail every close call with `message`.
    pub fn fail_on_close(mut self, message: impl Into<String>) -> Self {
        self.fail_on_close = Some(message.into());
        self
    }

    /// Number of close calls received.
    pub fn close_count(&self) -> usize {
        self.closes.get()
    }

    /// Shared close counter, readable after the result set is dropped.
    pub fn close_counter(&self) -> Rc<Cell<usize>> {
        Rc::clone(&self.closes)
    }

    /// Last fetch limit hint received.
    pub fn fetch_limit(&self) -> Option<u64> {
        self.fetch_limit
    }
}

impl NativeResultSet for MemoryResultSet {
    fn column_names(&self) -> &[String] {
        &self.columns
    }

    fn next_row(&mut self) -> Result<Option<Row>> {
        if let Some((after, message)) = &self.fail_after {
            if self.served == *after {
                return Err(DbError::Cursor(message.clone()));
            }
        }
        let row = self.rows.pop_front();
        if row.is_some() {
            self.served += 1;
        }
        Ok(row)
    }

    fn set_fetch_limit(&mut self, limit: Option<u64>) {
        self.fetch_limit = limit;
    }

    fn close(&mut self) -> Result<()> {
        self.closes.set(self.closes.get() + 1);
        self.rows.clear();
        match &self.fail_on_close {
            Some(message) => Err(DbError::Cursor(message.clone())),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::SqlValue;

    #[test]
    fn test_from_json() {
        let mut rs = MemoryResultSet::from_json(
            r#"{"columns": ["name", "pos"], "rows": [["fk_a", 1], [null, 2]]}"#,
        )
        .unwrap();
        assert_eq!(rs.column_names(), ["name".to_string(), "pos".to_string()]);
        assert_eq!(
            rs.next_row().unwrap(),
            Some(vec![SqlValue::from("fk_a"), SqlValue::I64(1)])
        );
        assert_eq!(rs.next_row().unwrap().unwrap()[0], SqlValue::Null);
        assert_eq!(rs.next_row().unwrap(), None);
    }

    #[test]
    fn test_from_json_keeps_numeric_text() {
        let mut rs = MemoryResultSet::from_json(
            r#"{"columns": ["schema", "id", "ratio", "uid"],
                "rows": [["2024", 12, 0.5, "00000000-0000-0000-0000-000000000000"]]}"#,
        )
        .unwrap();
        assert_eq!(
            rs.next_row().unwrap().unwrap(),
            vec![
                SqlValue::from("2024"),
                SqlValue::I64(12),
                SqlValue::F64(0.5),
                SqlValue::from("00000000-0000-0000-0000-000000000000"),
            ]
        );
    }

    #[test]
    fn test_from_json_rejects_nested_cells() {
        let err = MemoryResultSet::from_json(r#"{"columns": ["a"], "rows": [[[1, 2]]]}"#)
            .unwrap_err();
        assert!(matches!(err, DbError::Driver { .. }));
    }

    #[test]
    fn test_from_json_rejects_ragged_rows() {
        let err = MemoryResultSet::from_json(r#"{"columns": ["a", "b"], "rows": [[1]]}"#)
            .unwrap_err();
        assert!(matches!(err, DbError::Driver { .. }));
        assert!(MemoryResultSet::from_json("not json").is_err());
    }

    #[test]
    fn test_close_clears_rows() {
        let mut rs = MemoryResultSet::new(vec!["a".into()], vec![vec![SqlValue::I64(1)]]);
        rs.close().unwrap();
        assert_eq!(rs.close_count(), 1);
        assert_eq!(rs.next_row().unwrap(), None);
    }
}
