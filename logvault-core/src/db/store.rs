//! Database store layer
//!
//! Provides the scoped connection handle plus the raw query/execute
//! primitives and the log insert/query operations built on them.
//!
//! A [`Database`] is opened per logical unit of work and dropped when the
//! caller is done; nothing here holds a connection across calls.

use crate::error::Result;
use crate::types::{LogEntry, LogFilter, LogLevel};
use rusqlite::types::ValueRef;
use rusqlite::{params_from_iter, Connection, Row};
use std::path::Path;
use std::sync::Mutex;

/// Columns returned by the log query path, in table order.
const LOG_COLUMNS: &str =
    "id, timestamp, level, message, data, session_id, command, context, error_stack, created_at";

/// Result of a raw read query: column names plus rows as name→value maps.
#[derive(Debug, Clone, Default)]
pub struct ResultSet {
    /// Column names in statement order
    pub columns: Vec<String>,
    /// Rows, each a mapping of column name to JSON value
    pub rows: Vec<serde_json::Map<String, serde_json::Value>>,
}

/// Fields of a log entry supplied by the caller; id and timestamps are
/// assigned by the storage layer.
#[derive(Debug, Clone)]
pub struct NewLogEntry {
    pub level: LogLevel,
    pub message: String,
    pub session_id: Option<String>,
    pub command: Option<String>,
    pub context: Option<String>,
    /// Absent maps to SQL NULL; an empty mapping is stored as `{}`
    pub data: Option<serde_json::Value>,
    pub error_stack: Option<String>,
}

/// Database handle wrapping a single connection
pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    /// Open or create a database at the given path
    pub fn open(path: &Path) -> Result<Self> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;

        // WAL mode for better behavior under concurrent callers
        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            ",
        )?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Open an in-memory database (for testing)
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Run migrations on this database
    pub fn migrate(&self) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        super::schema::run_migrations(&conn)
    }

    // ============================================
    // Raw SQL operations
    // ============================================

    /// Execute a read query with positional params, returning columns and
    /// rows verbatim — no post-processing beyond SQLite's own typing.
    pub fn query(&self, sql: &str, params: &[serde_json::Value]) -> Result<ResultSet> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(sql)?;

        let columns: Vec<String> = stmt
            .column_names()
            .into_iter()
            .map(|c| c.to_string())
            .collect();

        let bound: Vec<rusqlite::types::Value> = params.iter().map(json_to_sql).collect();
        let mut rows = stmt.query(params_from_iter(bound))?;

        let mut out = Vec::new();
        while let Some(row) = rows.next()? {
            let mut map = serde_json::Map::with_capacity(columns.len());
            for (i, name) in columns.iter().enumerate() {
                map.insert(name.clone(), column_to_json(row.get_ref(i)?));
            }
            out.push(map);
        }

        Ok(ResultSet {
            columns,
            rows: out,
        })
    }

    /// Execute a statement with positional params, returning the
    /// affected-row count and discarding any result set.
    pub fn execute(&self, sql: &str, params: &[serde_json::Value]) -> Result<u64> {
        let conn = self.conn.lock().unwrap();
        let bound: Vec<rusqlite::types::Value> = params.iter().map(json_to_sql).collect();
        let changes = conn.execute(sql, params_from_iter(bound))?;
        Ok(changes as u64)
    }

    // ============================================
    // Log operations
    // ============================================

    /// Insert one log entry and return its row id.
    ///
    /// The insert and the last-insert-id read happen under the same lock
    /// acquisition, so the returned id is this call's own insert even with
    /// concurrent stores against the same path.
    pub fn insert_log(&self, entry: &NewLogEntry) -> Result<i64> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            r#"
            INSERT INTO logs (level, message, data, session_id, command, context, error_stack)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
            rusqlite::params![
                entry.level.as_str(),
                entry.message,
                entry.data.as_ref().map(|v| v.to_string()),
                entry.session_id,
                entry.command,
                entry.context,
                entry.error_stack,
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// Query log entries with optional filtering.
    ///
    /// Clause assembly is deterministic: predicates in fixed order
    /// (session_id, command, level membership) joined with AND, the WHERE
    /// keyword omitted entirely when no predicate applies, then ORDER BY
    /// timestamp and parameterized LIMIT/OFFSET.
    pub fn query_logs(&self, filter: &LogFilter) -> Result<Vec<LogEntry>> {
        let conn = self.conn.lock().unwrap();

        let mut clauses: Vec<String> = Vec::new();
        let mut values: Vec<rusqlite::types::Value> = Vec::new();

        if let Some(session_id) = &filter.session_id {
            clauses.push("session_id = ?".to_string());
            values.push(session_id.clone().into());
        }

        if let Some(command) = &filter.command {
            clauses.push("command = ?".to_string());
            values.push(command.clone().into());
        }

        if let Some(levels) = &filter.levels {
            // One placeholder per member, duplicates included as given
            let placeholders = vec!["?"; levels.len()].join(", ");
            clauses.push(format!("level IN ({})", placeholders));
            for level in levels {
                values.push(level.as_str().to_string().into());
            }
        }

        let mut sql = format!("SELECT {} FROM logs", LOG_COLUMNS);
        if !clauses.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&clauses.join(" AND "));
        }

        sql.push_str(" ORDER BY timestamp ");
        sql.push_str(filter.order.as_sql());

        if let Some(limit) = filter.limit {
            sql.push_str(" LIMIT ?");
            values.push(i64::from(limit).into());
        }
        if let Some(offset) = filter.offset {
            // SQLite cannot parse OFFSET without LIMIT
            if filter.limit.is_none() {
                sql.push_str(" LIMIT -1");
            }
            sql.push_str(" OFFSET ?");
            values.push(i64::from(offset).into());
        }

        let mut stmt = conn.prepare(&sql)?;
        let entries = stmt
            .query_map(params_from_iter(values), row_to_log_entry)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(entries)
    }

    /// Count all rows in the logs table
    pub fn count_logs(&self) -> Result<i64> {
        let conn = self.conn.lock().unwrap();
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM logs", [], |r| r.get(0))?;
        Ok(count)
    }
}

/// Idempotent pre-flight guard: guarantee the logs table exists at `path`.
///
/// Opens its own short-lived connection and runs migrations; safe to call
/// before every log operation, including concurrently against the same
/// path. Open or DDL failures propagate.
pub fn ensure_logs_table(path: &Path) -> Result<()> {
    let db = Database::open(path)?;
    db.migrate()
}

fn row_to_log_entry(row: &Row) -> rusqlite::Result<LogEntry> {
    let level_str: String = row.get("level")?;
    let level: LogLevel = level_str.parse().map_err(|e| {
        // Level column is index 2 of LOG_COLUMNS
        rusqlite::Error::FromSqlConversionFailure(2, rusqlite::types::Type::Text, Box::new(e))
    })?;
    let data_str: Option<String> = row.get("data")?;

    Ok(LogEntry {
        id: row.get("id")?,
        timestamp: row.get("timestamp")?,
        level,
        message: row.get("message")?,
        data: data_str.and_then(|s| serde_json::from_str(&s).ok()),
        session_id: row.get("session_id")?,
        command: row.get("command")?,
        context: row.get("context")?,
        error_stack: row.get("error_stack")?,
        created_at: row.get("created_at")?,
    })
}

/// Convert a JSON param to a SQLite value for binding.
///
/// Scalars map directly; arrays and objects are bound as their JSON text.
fn json_to_sql(value: &serde_json::Value) -> rusqlite::types::Value {
    use rusqlite::types::Value as Sql;
    match value {
        serde_json::Value::Null => Sql::Null,
        serde_json::Value::Bool(b) => Sql::Integer(i64::from(*b)),
        serde_json::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Sql::Integer(i)
            } else {
                Sql::Real(n.as_f64().unwrap_or(0.0))
            }
        }
        serde_json::Value::String(s) => Sql::Text(s.clone()),
        other => Sql::Text(other.to_string()),
    }
}

/// Convert a SQLite column value to JSON.
fn column_to_json(value: ValueRef<'_>) -> serde_json::Value {
    match value {
        ValueRef::Null => serde_json::Value::Null,
        ValueRef::Integer(i) => serde_json::Value::from(i),
        ValueRef::Real(f) => serde_json::Value::from(f),
        ValueRef::Text(t) => serde_json::Value::from(String::from_utf8_lossy(t).into_owned()),
        ValueRef::Blob(b) => serde_json::Value::from(b.to_vec()),
    }
}
