//! dbnav CLI - schema metadata and administrative SQL tools.

mod report;

use clap::{Parser, Subcommand};
use dbnav::{
    find_table, load_foreign_keys, Config, Container, DbError, EvaluationContext, ForeignKey,
    MemoryResultSet, MysqlDialect, OracleTruncateTable, QualifiedName, RowCursor,
    SchemaSnapshot, SqlToolHandler, Statement, Table, TablePartition, ToolSession,
};
use report::{ForeignKeyReport, TruncateReport};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{info, Level};
use tracing_subscriber::fmt::format::FmtSpan;

#[derive(Parser)]
#[command(name = "dbnav")]
#[command(about = "Schema metadata and administrative SQL tools")]
#[command(version)]
struct Cli {
    /// Path to YAML configuration file
    #[arg(short, long, default_value = "config.yaml")]
    config: PathBuf,

    /// Output JSON result to stdout
    #[arg(long)]
    output_json: bool,

    /// Log format: text or json
    #[arg(long, default_value = "text")]
    log_format: String,

    /// Log verbosity: debug, info, warn, error
    #[arg(long, default_value = "info")]
    verbosity: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a TRUNCATE statement for an Oracle table or partition
    Truncate {
        /// Table as SCHEMA.TABLE (bare names use the configured schema)
        #[arg(long)]
        table: String,

        /// Truncate this partition instead of the whole table
        #[arg(long)]
        partition: Option<String>,

        /// The partition is a sub-partition
        #[arg(long, requires = "partition")]
        subpartition: bool,

        /// Keep deallocated storage (overrides the configured default)
        #[arg(long)]
        reuse_storage: bool,
    },

    /// List foreign keys from a schema file
    ForeignKeys {
        /// YAML schema snapshot
        #[arg(long)]
        schema_file: PathBuf,

        /// Only this table (SCHEMA.TABLE or TABLE)
        #[arg(long)]
        table: Option<String>,

        /// Print DDL for each key
        #[arg(long)]
        ddl: bool,
    },

    /// Copy a foreign key onto another table and print its DDL
    CopyForeignKey {
        /// YAML schema snapshot
        #[arg(long)]
        schema_file: PathBuf,

        /// Table owning the key
        #[arg(long)]
        from: String,

        /// Foreign key name
        #[arg(long)]
        key: String,

        /// Table receiving the copy
        #[arg(long)]
        to: String,
    },

    /// Rebuild a table's foreign keys from captured MySQL metadata rows
    ReplayForeignKeys {
        /// YAML schema snapshot holding the table's columns
        #[arg(long)]
        schema_file: PathBuf,

        /// Table the rows belong to
        #[arg(long)]
        table: String,

        /// JSON capture of the foreign key metadata query
        #[arg(long)]
        rows: PathBuf,

        /// Row cap (overrides cursor.max_rows, 0 = unlimited)
        #[arg(long)]
        max_rows: Option<u64>,
    },
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", e.format_detailed());
            ExitCode::from(e.exit_code())
        }
    }
}

fn run() -> Result<(), DbError> {
    let cli = Cli::parse();

    setup_logging(&cli.verbosity, &cli.log_format).map_err(DbError::Config)?;

    let config = Config::load(&cli.config)?;
    info!("Loaded configuration from {:?}", cli.config);

    match cli.command {
        Commands::Truncate {
            table,
            partition,
            subpartition,
            reuse_storage,
        } => {
            let data_source = config.data_source()?;
            let (schema, name) = split_table(&table, config.default_schema());
            let container = schema.map(Container::schema).unwrap_or_default();
            let mut target_table = Table::new(Arc::clone(&data_source), container, name);

            if let Some(p) = &partition {
                let mut part = TablePartition::partition(p.as_str());
                part.is_sub_partition = subpartition;
                target_table.partitions.push(part);
            }
            let target = match &partition {
                Some(p) => target_table.partition_target(p)?,
                None => target_table.as_target(),
            };

            let handler = OracleTruncateTable::new();
            let mut settings = config.tools.truncate;
            settings.reuse_storage |= reuse_storage;

            let session = ToolSession::new(data_source, "truncate");
            let mut queries = Vec::new();
            handler.generate_statements(&session, &settings, target, &mut queries)?;

            let report = TruncateReport {
                target: target.qualified_name(EvaluationContext::Ui)?,
                statements: queries.into_iter().map(|q| q.sql).collect(),
                needs_refresh: handler.needs_refresh_on_finish(),
            };
            if cli.output_json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                report.print();
            }
        }

        Commands::ForeignKeys {
            schema_file,
            table,
            ddl,
        } => {
            let tables = load_tables(&config, &schema_file)?;
            let selected: Vec<&Table> = match &table {
                Some(t) => vec![find_table(&tables, t)?],
                None => tables.iter().collect(),
            };

            let mut reports = Vec::new();
            for t in selected {
                for fk in &t.foreign_keys {
                    reports.push(ForeignKeyReport::new(fk, t, ddl)?);
                }
            }
            info!("Found {} foreign keys", reports.len());
            print_foreign_keys(&reports, cli.output_json)?;
        }

        Commands::CopyForeignKey {
            schema_file,
            from,
            key,
            to,
        } => {
            let tables = load_tables(&config, &schema_file)?;
            let source_table = find_table(&tables, &from)?;
            let source = source_table.foreign_key(&key).ok_or_else(|| {
                DbError::resolution(
                    format!("table {}", source_table.full_name()),
                    format!("foreign key {}", key),
                )
            })?;
            let target_table = find_table(&tables, &to)?;

            let copy = ForeignKey::copy_from(source, target_table)?;
            let report = ForeignKeyReport::new(&copy, target_table, true)?;
            print_foreign_keys(&[report], cli.output_json)?;
        }

        Commands::ReplayForeignKeys {
            schema_file,
            table,
            rows,
            max_rows,
        } => {
            let tables = load_tables(&config, &schema_file)?;
            let target_table = find_table(&tables, &table)?;

            let statement = Statement::new(MysqlDialect::new().foreign_keys_query())
                .with_label(format!("foreign keys of {}", target_table.full_name()));
            let mut cursor = RowCursor::new(statement, MemoryResultSet::load(&rows)?);
            cursor.set_max_rows(max_rows.unwrap_or(config.cursor.max_rows));

            let keys = load_foreign_keys(cursor, target_table)?;
            let reports = keys
                .iter()
                .map(|fk| ForeignKeyReport::new(fk, target_table, false))
                .collect::<Result<Vec<_>, _>>()?;
            print_foreign_keys(&reports, cli.output_json)?;
        }
    }

    Ok(())
}

fn load_tables(config: &Config, schema_file: &Path) -> Result<Vec<Table>, DbError> {
    let tables = SchemaSnapshot::load(schema_file)?
        .into_tables(config.data_source()?, config.default_schema())?;
    info!("Loaded {} tables from {:?}", tables.len(), schema_file);
    Ok(tables)
}

/// Split `SCHEMA.TABLE`, falling back to `default_schema` for bare names.
fn split_table<'a>(qualified: &'a str, default_schema: Option<&'a str>) -> (Option<&'a str>, &'a str) {
    match qualified.rsplit_once('.') {
        Some((schema, name)) => (Some(schema), name),
        None => (default_schema, qualified),
    }
}

fn print_foreign_keys(reports: &[ForeignKeyReport], json: bool) -> Result<(), DbError> {
    if json {
        println!("{}", serde_json::to_string_pretty(reports)?);
    } else if reports.is_empty() {
        println!("No foreign keys found");
    } else {
        for report in reports {
            report.print();
        }
    }
    Ok(())
}

fn setup_logging(verbosity: &str, format: &str) -> Result<(), String> {
    let level = match verbosity.to_lowercase().as_str() {
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_span_events(FmtSpan::CLOSE)
        .with_target(false)
        .with_writer(std::io::stderr);

    match format {
        "json" => subscriber.json().init(),
        "text" => subscriber.init(),
        other => return Err(format!("unknown log format '{}'", other)),
    }

    Ok(())
}
