//! # logvault-rpc
//!
//! Remote-callable procedures over the logvault storage layer.
//!
//! Four procedures are exposed: `db.query` and `db.execute` pass raw SQL
//! through to a scoped connection; `logs.store` and `logs.query` write and
//! read the `logs` table, guarded by an idempotent table-ensure step.
//! Transport and framing are the embedding application's concern — this
//! crate only dispatches JSON inputs to typed handlers.
//!
//! ## Example
//!
//! ```rust,no_run
//! use logvault_rpc::{register_all, ProcedureRegistry};
//!
//! # async fn run() -> logvault_core::Result<()> {
//! let mut registry = ProcedureRegistry::new();
//! register_all(&mut registry)?;
//!
//! let out = registry
//!     .call("logs.store", serde_json::json!({"level": "info", "message": "hello"}))
//!     .await?;
//! # Ok(())
//! # }
//! ```

pub use procedures::register_all;
pub use registry::ProcedureRegistry;

// Re-export the shared error type for callers that only depend on this crate
pub use logvault_core::{Error, Result};

pub mod procedures;
pub mod registry;
