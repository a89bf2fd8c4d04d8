//! Row cursors over native driver result sets.
//!
//! [`RowCursor`] wraps exactly one [`NativeResultSet`] together with the
//! [`Statement`] that produced it. Upstream code only ever sees `RowCursor`,
//! never a vendor-specific cursor type.
//!
//! # Resource discipline
//!
//! Native cursors hold connection-bound resources. A `RowCursor`:
//! - closes itself when the row cap is reached or the native cursor is exhausted
//! - closes itself when a fetch fails, before returning the error
//! - closes itself on drop if still open
//!
//! `close()` is idempotent: the first call reports the native close result,
//! later calls do nothing and return `Ok(())`.

mod memory;

pub use memory::MemoryResultSet;

use tracing::{debug, warn};

use crate::core::value::Row;
use crate::error::{DbError, Result};

/// Native driver result cursor.
///
/// Implemented by each driver binding; the cursor is forward-only.
pub trait NativeResultSet {
    /// Column labels in result order.
    fn column_names(&self) -> &[String];

    /// Fetch the next row, or `None` when exhausted.
    fn next_row(&mut self) -> Result<Option<Row>>;

    /// Hint the driver to stop fetching after `limit` more rows.
    ///
    /// `None` means no limit. [`RowCursor`] never sends `Some(0)`; bindings
    /// whose native call treats zero as unlimited can forward the value as is.
    fn set_fetch_limit(&mut self, limit: Option<u64>) {
        let _ = limit;
    }

    /// Release the native resources.
    fn close(&mut self) -> Result<()>;
}

/// The statement a cursor was opened from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    /// SQL text as sent to the driver.
    pub sql: String,

    /// Optional label for logs (e.g., "load foreign keys").
    pub label: Option<String>,
}

impl Statement {
    pub fn new(sql: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            label: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    fn describe(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.sql)
    }
}

/// Uniform cursor over a native result set.
#[derive(Debug)]
pub struct RowCursor<R: NativeResultSet> {
    statement: Statement,
    native: R,
    max_rows: Option<u64>,
    fetched: u64,
    closed: bool,
}

impl<R: NativeResultSet> RowCursor<R> {
    /// Wrap an open native cursor.
    pub fn new(statement: Statement, native: R) -> Self {
        Self {
            statement,
            native,
            max_rows: None,
            fetched: 0,
            closed: false,
        }
    }

    /// The statement this cursor was opened from.
    pub fn source_statement(&self) -> &Statement {
        &self.statement
    }

    /// The wrapped native cursor.
    pub fn original(&self) -> &R {
        &self.native
    }

    /// The wrapped native cursor, for driver-specific calls.
    pub fn original_mut(&mut self) -> &mut R {
        &mut self.native
    }

    /// Column labels in result order.
    pub fn column_names(&self) -> &[String] {
        self.native.column_names()
    }

    /// Cap the number of rows this cursor returns; `0` removes the cap.
    ///
    /// May be called mid-iteration: rows already fetched count against it.
    /// When the cap is already reached, no hint is sent and the next
    /// [`RowCursor::next_row`] closes the cursor.
    pub fn set_max_rows(&mut self, max_rows: u64) {
        self.max_rows = (max_rows > 0).then_some(max_rows);
        match self.max_rows.map(|m| m.saturating_sub(self.fetched)) {
            Some(0) => {}
            remaining => self.native.set_fetch_limit(remaining),
        }
    }

    pub fn max_rows(&self) -> Option<u64> {
        self.max_rows
    }

    /// Rows returned so far.
    pub fn fetched(&self) -> u64 {
        self.fetched
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Fetch the next row.
    ///
    /// Returns `Ok(None)` once the cap is reached or the native cursor is
    /// exhausted; the cursor is closed at that point.
    ///
    /// # Errors
    ///
    /// Returns `DbError::CursorClosed` after close, or the native fetch
    /// error (the cursor is closed first).
    pub fn next_row(&mut self) -> Result<Option<Row>> {
        if self.closed {
            return Err(DbError::CursorClosed);
        }

        if self.max_rows.is_some_and(|m| self.fetched >= m) {
            debug!(
                "Row cap {} reached for {}",
                self.fetched,
                self.statement.describe()
            );
            self.close()?;
            return Ok(None);
        }

        match self.native.next_row() {
            Ok(Some(row)) => {
                self.fetched += 1;
                Ok(Some(row))
            }
            Ok(None) => {
                self.close()?;
                Ok(None)
            }
            Err(e) => {
                if let Err(close_err) = self.close() {
                    warn!(
                        "Failed to close cursor for {} after fetch error: {}",
                        self.statement.describe(),
                        close_err
                    );
                }
                Err(e)
            }
        }
    }

    /// Close the cursor and release the native resources.
    ///
    /// Later calls are no-ops. The cursor counts as closed even if the
    /// native close fails, so the failure is reported exactly once.
    pub fn close(&mut self) -> Result<()> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        debug!(
            "Closing cursor for {} after {} row(s)",
            self.statement.describe(),
            self.fetched
        );
        self.native.close()
    }

    /// Iterate remaining rows.
    pub fn rows(&mut self) -> Rows<'_, R> {
        Rows { cursor: self }
    }

    /// Drain the remaining rows into a vector.
    pub fn collect_rows(&mut self) -> Result<Vec<Row>> {
        self.rows().collect()
    }
}

impl<R: NativeResultSet> Drop for RowCursor<R> {
    fn drop(&mut self) {
        if let Err(e) = self.close() {
            warn!(
                "Failed to close cursor for {}: {}",
                self.statement.describe(),
                e
            );
        }
    }
}

/// Iterator over the rows of a [`RowCursor`]. Stops after the first error.
pub struct Rows<'a, R: NativeResultSet> {
    cursor: &'a mut RowCursor<R>,
}

impl<R: NativeResultSet> Iterator for Rows<'_, R> {
    type Item = Result<Row>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.cursor.is_closed() {
            return None;
        }
        self.cursor.next_row().transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::SqlValue;

    fn rows(n: i64) -> Vec<Row> {
        (1..=n).map(|i| vec![SqlValue::I64(i)]).collect()
    }

    fn cursor(n: i64) -> RowCursor<MemoryResultSet> {
        RowCursor::new(
            Statement::new("SELECT id FROM t").with_label("test"),
            MemoryResultSet::new(vec!["id".to_string()], rows(n)),
        )
    }

    #[test]
    fn test_reads_all_rows_and_closes() {
        let mut c = cursor(3);
        let all = c.collect_rows().unwrap();
        assert_eq!(all.len(), 3);
        assert!(c.is_closed());
        assert_eq!(c.original().close_count(), 1);
        assert_eq!(c.fetched(), 3);
    }

    #[test]
    fn test_max_rows_caps_and_closes() {
        let mut c = cursor(10);
        c.set_max_rows(4);
        assert_eq!(c.original().fetch_limit(), Some(4));
        let all = c.collect_rows().unwrap();
        assert_eq!(all.len(), 4);
        assert!(c.is_closed());
        assert_eq!(c.original().close_count(), 1);
    }

    #[test]
    fn test_max_rows_zero_is_unlimited() {
        let mut c = cursor(5);
        c.set_max_rows(2);
        c.set_max_rows(0);
        assert_eq!(c.max_rows(), None);
        assert_eq!(c.original().fetch_limit(), None);
        assert_eq!(c.collect_rows().unwrap().len(), 5);
    }

    #[test]
    fn test_max_rows_mid_iteration() {
        let mut c = cursor(10);
        c.next_row().unwrap();
        c.next_row().unwrap();
        c.set_max_rows(3);
        assert_eq!(c.original().fetch_limit(), Some(1));
        assert_eq!(c.collect_rows().unwrap().len(), 1);
    }

    #[test]
    fn test_max_rows_below_fetched_sends_no_hint() {
        let mut c = cursor(10);
        c.next_row().unwrap();
        c.next_row().unwrap();
        c.next_row().unwrap();
        c.set_max_rows(2);
        assert_eq!(c.original().fetch_limit(), None);
        assert_eq!(c.next_row().unwrap(), None);
        assert!(c.is_closed());
        assert_eq!(c.original().close_count(), 1);
    }

    #[test]
    fn test_close_twice_is_noop() {
        let mut c = cursor(1);
        c.close().unwrap();
        c.close().unwrap();
        assert_eq!(c.original().close_count(), 1);
    }

    #[test]
    fn test_close_failure_reported_once() {
        let mut c = RowCursor::new(
            Statement::new("SELECT 1"),
            MemoryResultSet::new(vec![], vec![]).fail_on_close("socket reset"),
        );
        let err = c.close().unwrap_err();
        assert!(err.to_string().contains("socket reset"));
        assert!(c.close().is_ok());
        assert_eq!(c.original().close_count(), 1);
    }

    #[test]
    fn test_next_row_after_close_errors() {
        let mut c = cursor(2);
        c.close().unwrap();
        assert!(matches!(c.next_row(), Err(DbError::CursorClosed)));
        assert_eq!(c.rows().count(), 0);
    }

    #[test]
    fn test_fetch_error_closes_cursor() {
        let mut c = RowCursor::new(
            Statement::new("SELECT id FROM t"),
            MemoryResultSet::new(vec!["id".to_string()], rows(5)).fail_after(2, "connection lost"),
        );
        let results: Vec<_> = c.rows().collect();
        assert_eq!(results.len(), 3);
        assert!(results[2].is_err());
        assert!(c.is_closed());
        assert_eq!(c.original().close_count(), 1);
    }

    #[test]
    fn test_drop_closes_open_cursor() {
        let closes = {
            let mut c = cursor(5);
            c.next_row().unwrap();
            let counter = c.original().close_counter();
            counter
        };
        assert_eq!(closes.get(), 1);
    }

    #[test]
    fn test_drop_with_failing_close() {
        let closes = {
            let mut c = RowCursor::new(
                Statement::new("SELECT id FROM t"),
                MemoryResultSet::new(vec!["id".to_string()], rows(3))
                    .fail_on_close("socket reset"),
            );
            c.next_row().unwrap();
            let counter = c.original().close_counter();
            counter
        };
        assert_eq!(closes.get(), 1);
    }

    #[test]
    fn test_accessors() {
        let c = cursor(0);
        assert_eq!(c.source_statement().sql, "SELECT id FROM t");
        assert_eq!(c.source_statement().label.as_deref(), Some("test"));
        assert_eq!(c.column_names(), ["id".to_string()]);
    }
}
