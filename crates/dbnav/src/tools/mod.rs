//! Administrative SQL tools.
//!
//! A tool handler turns a user request against one or more tables into SQL
//! statements. Handlers only generate; running the statements is the
//! caller's business.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::traits::{EvaluationContext, QualifiedName};
use crate::error::Result;
use crate::model::{DataSource, TableTarget};

/// How a generated statement should be treated by the executor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    /// Schema change.
    Ddl,
    /// Data maintenance (truncate, gather stats, ...).
    Maintenance,
}

/// A generated SQL statement awaiting execution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistAction {
    pub sql: String,
    pub kind: ActionKind,
}

impl PersistAction {
    pub fn new(sql: impl Into<String>, kind: ActionKind) -> Self {
        Self {
            sql: sql.into(),
            kind,
        }
    }

    pub fn maintenance(sql: impl Into<String>) -> Self {
        Self::new(sql, ActionKind::Maintenance)
    }
}

/// Execution context shared by every handler invocation of one operation.
#[derive(Debug, Clone)]
pub struct ToolSession {
    pub data_source: Arc<DataSource>,

    /// Operation label for logs, e.g. "truncate".
    pub label: String,
}

impl ToolSession {
    pub fn new(data_source: Arc<DataSource>, label: impl Into<String>) -> Self {
        Self {
            data_source,
            label: label.into(),
        }
    }
}

/// Generates SQL for one administrative tool.
pub trait SqlToolHandler {
    /// User-chosen options for this tool.
    type Settings;

    /// Settings with every option at its default.
    fn create_settings(&self) -> Self::Settings;

    /// Append the statements for `target` to `queries`.
    ///
    /// Implementations must not execute anything.
    fn generate_statements(
        &self,
        session: &ToolSession,
        settings: &Self::Settings,
        target: TableTarget<'_>,
        queries: &mut Vec<PersistAction>,
    ) -> Result<()>;

    /// Whether the object tree must be reloaded after the statements run.
    fn needs_refresh_on_finish(&self) -> bool {
        false
    }
}

/// Statements generated for a batch of targets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolPlan {
    /// Statements in target order.
    pub statements: Vec<PersistAction>,
    pub needs_refresh: bool,
}

/// Run `handler` over every target and collect the generated statements.
///
/// Stops at the first target that fails to generate.
pub fn plan_tool<'a, H, I>(
    handler: &H,
    session: &ToolSession,
    settings: &H::Settings,
    targets: I,
) -> Result<ToolPlan>
where
    H: SqlToolHandler,
    I: IntoIterator<Item = TableTarget<'a>>,
{
    let mut statements = Vec::new();
    for target in targets {
        let before = statements.len();
        handler.generate_statements(session, settings, target, &mut statements)?;
        debug!(
            "{}: {} statement(s) for {}",
            session.label,
            statements.len() - before,
            target.qualified_name(EvaluationContext::Ui)?
        );
    }

    Ok(ToolPlan {
        statements,
        needs_refresh: handler.needs_refresh_on_finish(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Container, Table};

    struct Analyze;

    impl SqlToolHandler for Analyze {
        type Settings = bool;

        fn create_settings(&self) -> bool {
            false
        }

        fn generate_statements(
            &self,
            _session: &ToolSession,
            verbose: &bool,
            target: TableTarget<'_>,
            queries: &mut Vec<PersistAction>,
        ) -> Result<()> {
            let mut sql = format!("ANALYZE {}", target.qualified_name(EvaluationContext::Ddl)?);
            if *verbose {
                sql.push_str(" VERBOSE");
            }
            queries.push(PersistAction::maintenance(sql));
            Ok(())
        }
    }

    fn session() -> ToolSession {
        let ds = Arc::new(DataSource::from_db_type("local", "postgres").unwrap());
        ToolSession::new(ds, "analyze")
    }

    #[test]
    fn test_plan_keeps_target_order() {
        let session = session();
        let a = Table::new(Arc::clone(&session.data_source), Container::schema("public"), "a");
        let b = Table::new(Arc::clone(&session.data_source), Container::schema("public"), "b");

        let plan = plan_tool(&Analyze, &session, &true, [b.as_target(), a.as_target()]).unwrap();
        let sql: Vec<_> = plan.statements.iter().map(|s| s.sql.as_str()).collect();
        assert_eq!(sql, ["ANALYZE public.b VERBOSE", "ANALYZE public.a VERBOSE"]);
        assert!(!plan.needs_refresh);
    }

    #[test]
    fn test_plan_stops_on_error() {
        let session = session();
        let orphan = Table::new(Arc::clone(&session.data_source), Container::default(), "x");
        assert!(plan_tool(&Analyze, &session, &false, [orphan.as_target()]).is_err());
    }

    #[test]
    fn test_default_settings() {
        assert!(!Analyze.create_settings());
    }
}
