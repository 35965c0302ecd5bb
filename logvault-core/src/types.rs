//! Core domain types for logvault
//!
//! The data model is deliberately small: a single `logs` table, a fixed
//! severity enum mirrored by the table's CHECK constraint, and the filter
//! shape the query path assembles SQL from.

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ============================================
// Log level
// ============================================

/// Severity of a log entry.
///
/// The set is closed: it doubles as the acceptance check in `logs.store`
/// and as the CHECK constraint in the `logs` table, so the two must agree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

/// Error returned when a string is not one of the five valid levels.
#[derive(Debug, Clone, Error)]
#[error("invalid log level: {0}")]
pub struct ParseLevelError(pub String);

impl LogLevel {
    /// All valid levels, in severity order.
    pub const ALL: [LogLevel; 5] = [
        LogLevel::Trace,
        LogLevel::Debug,
        LogLevel::Info,
        LogLevel::Warn,
        LogLevel::Error,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for LogLevel {
    type Err = ParseLevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            other => Err(ParseLevelError(other.to_string())),
        }
    }
}

// ============================================
// Sort order
// ============================================

/// Direction of the `ORDER BY timestamp` clause in `logs.query`.
///
/// Typed rather than free text: an unrecognized value is rejected at the
/// input boundary instead of silently falling back to descending.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    /// SQL keyword for this direction.
    pub fn as_sql(&self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

// ============================================
// Log entry
// ============================================

/// One row of the `logs` table.
///
/// `timestamp` and `created_at` are kept as the TEXT the storage layer
/// assigned (column defaults), not reparsed into a datetime type — the
/// query path returns them verbatim.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    /// Row id, auto-assigned and monotonic per insert
    pub id: i64,
    /// Event time, assigned by the storage layer on insert
    pub timestamp: String,
    /// Severity
    pub level: LogLevel,
    /// Log message
    pub message: String,
    /// Structured payload; `None` when the entry was stored without one
    pub data: Option<serde_json::Value>,
    /// Originating CLI session
    pub session_id: Option<String>,
    /// Command that produced the entry
    pub command: Option<String>,
    /// Free-form context tag
    pub context: Option<String>,
    /// Captured stack trace for error entries
    pub error_stack: Option<String>,
    /// Insertion time, assigned by the storage layer
    pub created_at: String,
}

// ============================================
// Log filter
// ============================================

/// Conjunction of optional predicates for the log query path.
///
/// Predicate order is fixed (session, command, levels) so the assembled
/// clause order and the positional bind order stay mechanically in sync.
#[derive(Debug, Clone, Default)]
pub struct LogFilter {
    /// Exact session id match
    pub session_id: Option<String>,
    /// Exact command match
    pub command: Option<String>,
    /// Level membership set; duplicates are passed through as given
    pub levels: Option<Vec<LogLevel>>,
    /// Row limit, applied only when present
    pub limit: Option<u32>,
    /// Row skip, applied only when present
    pub offset: Option<u32>,
    /// Timestamp sort direction (descending by default)
    pub order: SortOrder,
}
