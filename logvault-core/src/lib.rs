//! # logvault-core
//!
//! Storage layer for the logvault CLI log database.
//!
//! This library provides:
//! - Domain types for log entries, levels, and query filters
//! - A SQLite store with embedded schema migrations
//! - Configuration management and default path resolution
//! - Logging infrastructure
//!
//! ## Example
//!
//! ```rust,no_run
//! use logvault_core::config::default_db_path;
//! use logvault_core::db::Database;
//!
//! let db = Database::open(&default_db_path()).expect("failed to open database");
//! db.migrate().expect("failed to run migrations");
//! ```

// Re-export commonly used items at the crate root
pub use config::Config;
pub use db::{Database, NewLogEntry, ResultSet};
pub use error::{Error, Result};
pub use types::{LogEntry, LogFilter, LogLevel, SortOrder};

// Public modules
pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod types;
