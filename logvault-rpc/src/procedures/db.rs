//! Raw SQL pass-through procedures: `db.query` and `db.execute`
//!
//! Both open a scoped connection at the resolved path, run the statement
//! with positional params, and return the engine's answer verbatim. No
//! table-ensure pre-flight here; that guard belongs to the log procedures.

use crate::registry::ProcedureRegistry;
use logvault_core::config::default_db_path;
use logvault_core::{Database, Result, ResultSet};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::PathBuf;

/// Resolve the target database: explicit `dbPath` wins over the default.
pub(crate) fn resolve_db_path(db_path: Option<PathBuf>) -> PathBuf {
    db_path.unwrap_or_else(default_db_path)
}

/// Input shape shared by `db.query` and `db.execute`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SqlInput {
    /// Statement to run
    pub sql: String,
    /// Positional bind values, substituted in appearance order
    #[serde(default)]
    pub params: Vec<Value>,
    /// Target database file; defaults to `<home>/logs/cli/cli.db`
    #[serde(default)]
    pub db_path: Option<PathBuf>,
}

/// Output shape of `db.query`.
#[derive(Debug, Serialize)]
pub struct QueryOutput {
    pub columns: Vec<String>,
    pub rows: Vec<serde_json::Map<String, Value>>,
}

/// Output shape of `db.execute`.
#[derive(Debug, Serialize)]
pub struct ExecuteOutput {
    pub changes: u64,
}

/// `db.query`: run a read query and return columns plus rows.
pub async fn query(input: SqlInput) -> Result<QueryOutput> {
    let path = resolve_db_path(input.db_path);
    tracing::debug!(path = %path.display(), "db.query");

    let db = Database::open(&path)?;
    let ResultSet { columns, rows } = db.query(&input.sql, &input.params)?;
    Ok(QueryOutput { columns, rows })
}

/// `db.execute`: run a statement and return the affected-row count.
pub async fn execute(input: SqlInput) -> Result<ExecuteOutput> {
    let path = resolve_db_path(input.db_path);
    tracing::debug!(path = %path.display(), "db.execute");

    let db = Database::open(&path)?;
    let changes = db.execute(&input.sql, &input.params)?;
    Ok(ExecuteOutput { changes })
}

pub(crate) fn register(registry: &mut ProcedureRegistry) -> Result<()> {
    registry.register(
        &["db", "query"],
        "Run a read query against the CLI log database and return columns and rows",
        query,
    )?;
    registry.register(
        &["db", "execute"],
        "Run a mutating SQL statement and return the affected-row count",
        execute,
    )?;
    Ok(())
}
