//! Oracle driver: dialect and administrative tools.

mod dialect;
mod truncate;

pub use dialect::OracleDialect;
pub use truncate::{OracleTruncateTable, TruncateSettings};
