//! Log procedures: `logs.store` and `logs.query`
//!
//! Both run the table-ensure guard before touching the store, so a fresh
//! database file needs no separate schema-creation call. `logs.store`
//! validates the level before any I/O at all.

use crate::procedures::db::resolve_db_path;
use crate::registry::ProcedureRegistry;
use logvault_core::db::ensure_logs_table;
use logvault_core::{Database, Error, LogEntry, LogFilter, LogLevel, NewLogEntry, Result, SortOrder};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::PathBuf;

/// Input shape of `logs.store`.
///
/// `level` arrives as free text and is parsed against the closed level set
/// by the handler; `data` must be a JSON mapping when present.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreInput {
    pub level: String,
    pub message: String,
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub command: Option<String>,
    #[serde(default)]
    pub context: Option<String>,
    #[serde(default)]
    pub data: Option<serde_json::Map<String, Value>>,
    #[serde(default)]
    pub error_stack: Option<String>,
    #[serde(default)]
    pub db_path: Option<PathBuf>,
}

/// Output shape of `logs.store`.
#[derive(Debug, Serialize)]
pub struct StoreOutput {
    /// Row id of the inserted entry
    pub id: i64,
}

/// Level filter: a single level or a set of levels.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum LevelSelector {
    Single(LogLevel),
    Many(Vec<LogLevel>),
}

impl LevelSelector {
    /// Normalize to a membership set; a single level becomes a one-element
    /// set, a provided set is passed through in its given order.
    fn into_vec(self) -> Vec<LogLevel> {
        match self {
            LevelSelector::Single(level) => vec![level],
            LevelSelector::Many(levels) => levels,
        }
    }
}

/// Input shape of `logs.query`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryInput {
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub command: Option<String>,
    #[serde(default)]
    pub level: Option<LevelSelector>,
    #[serde(default)]
    pub limit: Option<u32>,
    #[serde(default)]
    pub offset: Option<u32>,
    /// Sort direction by timestamp; descending when absent
    #[serde(default)]
    pub order_by: Option<SortOrder>,
    #[serde(default)]
    pub db_path: Option<PathBuf>,
}

/// Output shape of `logs.query`.
#[derive(Debug, Serialize)]
pub struct QueryOutput {
    pub logs: Vec<LogEntry>,
}

/// `logs.store`: validate, ensure the table, insert one entry.
pub async fn store(input: StoreInput) -> Result<StoreOutput> {
    // Level check precedes table-ensure and connection work: invalid
    // calls never touch storage.
    let level: LogLevel = input
        .level
        .parse()
        .map_err(|_| Error::InvalidLevel(input.level.clone()))?;

    let path = resolve_db_path(input.db_path);
    ensure_logs_table(&path)?;

    let db = Database::open(&path)?;
    let id = db.insert_log(&NewLogEntry {
        level,
        message: input.message,
        session_id: input.session_id,
        command: input.command,
        context: input.context,
        data: input.data.map(Value::Object),
        error_stack: input.error_stack,
    })?;

    tracing::debug!(id, level = %level, "logs.store");
    Ok(StoreOutput { id })
}

/// `logs.query`: ensure the table, then run the assembled filter query.
pub async fn query(input: QueryInput) -> Result<QueryOutput> {
    let path = resolve_db_path(input.db_path);
    ensure_logs_table(&path)?;

    let filter = LogFilter {
        session_id: input.session_id,
        command: input.command,
        levels: input.level.map(LevelSelector::into_vec),
        limit: input.limit,
        offset: input.offset,
        order: input.order_by.unwrap_or_default(),
    };

    let db = Database::open(&path)?;
    let logs = db.query_logs(&filter)?;
    tracing::debug!(count = logs.len(), "logs.query");
    Ok(QueryOutput { logs })
}

pub(crate) fn register(registry: &mut ProcedureRegistry) -> Result<()> {
    registry.register(
        &["logs", "store"],
        "Store one CLI log entry with optional structured data",
        store,
    )?;
    registry.register(
        &["logs", "query"],
        "Query CLI log entries with optional filters, ordering, and pagination",
        query,
    )?;
    Ok(())
}
