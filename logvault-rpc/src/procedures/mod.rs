//! The four remote-callable procedures and their registration entrypoint.

pub mod db;
pub mod logs;

use crate::registry::ProcedureRegistry;
use logvault_core::Result;

/// Register all procedures with the given registry.
///
/// Called once during service startup. Registers, in order:
/// `db.query`, `db.execute`, `logs.store`, `logs.query`.
pub fn register_all(registry: &mut ProcedureRegistry) -> Result<()> {
    db::register(registry)?;
    logs::register(registry)?;
    Ok(())
}
