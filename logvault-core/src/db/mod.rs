//! Database layer for logvault
//!
//! This module provides the storage layer using SQLite with:
//! - Schema migrations guarded by PRAGMA user_version
//! - Raw query/execute primitives with positional JSON params
//! - Log insert and filtered query operations

pub mod schema;
pub mod store;

pub use store::{ensure_logs_table, Database, NewLogEntry, ResultSet};
