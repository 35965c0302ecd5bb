//! Database schema and migrations
//!
//! Uses SQLite with embedded migrations managed via PRAGMA user_version.
//! Every DDL statement also carries IF NOT EXISTS so that reapplying a
//! migration against the same file (including concurrently) is harmless.

use rusqlite::Connection;

/// Current schema version
pub const SCHEMA_VERSION: i32 = 1;

/// One versioned schema change with forward and backward scripts.
#[derive(Debug, Clone, Copy)]
pub struct Migration {
    /// Positive, contiguous version number
    pub version: i32,
    /// Human-readable summary
    pub description: &'static str,
    /// Forward DDL
    pub up: &'static str,
    /// Reverse DDL
    pub down: &'static str,
}

/// All migrations, in version order
pub const MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    description: "create logs table and indexes",
    up: r#"
    CREATE TABLE IF NOT EXISTS logs (
        id          INTEGER PRIMARY KEY AUTOINCREMENT,
        timestamp   TEXT NOT NULL DEFAULT (datetime('now')),
        level       TEXT NOT NULL CHECK (level IN ('trace','debug','info','warn','error')),
        message     TEXT NOT NULL,
        data        TEXT,
        session_id  TEXT,
        command     TEXT,
        context     TEXT,
        error_stack TEXT,
        created_at  TEXT NOT NULL DEFAULT (datetime('now'))
    );

    CREATE INDEX IF NOT EXISTS idx_logs_session_id ON logs(session_id);
    CREATE INDEX IF NOT EXISTS idx_logs_level ON logs(level);
    CREATE INDEX IF NOT EXISTS idx_logs_timestamp ON logs(timestamp);
    CREATE INDEX IF NOT EXISTS idx_logs_command ON logs(command);
    "#,
    down: r#"
    DROP INDEX IF EXISTS idx_logs_command;
    DROP INDEX IF EXISTS idx_logs_timestamp;
    DROP INDEX IF EXISTS idx_logs_level;
    DROP INDEX IF EXISTS idx_logs_session_id;
    DROP TABLE IF EXISTS logs;
    "#,
}];

/// Run all pending migrations
pub fn run_migrations(conn: &Connection) -> crate::error::Result<()> {
    let current_version: i32 = conn
        .query_row("PRAGMA user_version", [], |r| r.get(0))
        .unwrap_or(0);

    for migration in MIGRATIONS {
        if migration.version > current_version {
            tracing::info!(
                version = migration.version,
                description = migration.description,
                "Running migration"
            );
            conn.execute_batch(migration.up)?;
            conn.execute(&format!("PRAGMA user_version = {}", migration.version), [])?;
        }
    }

    Ok(())
}

/// Roll back all applied migrations, newest first
pub fn revert_migrations(conn: &Connection) -> crate::error::Result<()> {
    let current_version: i32 = conn
        .query_row("PRAGMA user_version", [], |r| r.get(0))
        .unwrap_or(0);

    for migration in MIGRATIONS.iter().rev() {
        if migration.version <= current_version {
            tracing::info!(version = migration.version, "Reverting migration");
            conn.execute_batch(migration.down)?;
            conn.execute(
                &format!("PRAGMA user_version = {}", migration.version - 1),
                [],
            )?;
        }
    }

    Ok(())
}

/// Get the current schema version from the database
pub fn get_schema_version(conn: &Connection) -> crate::error::Result<i32> {
    let version: i32 = conn.query_row("PRAGMA user_version", [], |r| r.get(0))?;
    Ok(version)
}
