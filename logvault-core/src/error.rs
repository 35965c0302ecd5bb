//! Error types for logvault-core

use thiserror::Error;

/// Main error type for the logvault crates
#[derive(Error, Debug)]
pub enum Error {
    /// Database error, propagated verbatim from the engine
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Log level outside the valid set, rejected before any I/O
    #[error("invalid log level: {0}")]
    InvalidLevel(String),

    /// Procedure input did not match its declared shape
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Call to a path no procedure is registered under
    #[error("procedure not found: {0}")]
    ProcedureNotFound(String),

    /// Second registration under an already-taken path
    #[error("procedure already registered: {0}")]
    DuplicateProcedure(String),
}

/// Result type alias for the logvault crates
pub type Result<T> = std::result::Result<T, Error>;
