//! Procedure registry
//!
//! Procedures live under hierarchical paths (`["db", "query"]`) and are
//! registered explicitly against a registry instance during service
//! startup — there is no module-load-time side effect. The registry owns
//! duplicate detection and path lookup; the transport that carries calls
//! to [`ProcedureRegistry::call`] is out of scope.

use futures::future::BoxFuture;
use logvault_core::{Error, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::future::Future;
use std::sync::Arc;

/// Type-erased async handler: JSON in, JSON out.
type Handler = Arc<dyn Fn(Value) -> BoxFuture<'static, Result<Value>> + Send + Sync>;

struct Procedure {
    description: String,
    handler: Handler,
}

/// Registry of remote-callable procedures keyed by dotted path.
#[derive(Default)]
pub struct ProcedureRegistry {
    procedures: BTreeMap<String, Procedure>,
}

impl ProcedureRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a typed procedure under a hierarchical path.
    ///
    /// The wrapper deserializes the raw JSON input into the handler's input
    /// type (rejecting mismatches as [`Error::InvalidInput`] before the
    /// handler runs) and serializes the typed output back to JSON. A second
    /// registration under the same path is refused.
    pub fn register<I, O, F, Fut>(
        &mut self,
        path: &[&str],
        description: &str,
        handler: F,
    ) -> Result<()>
    where
        I: DeserializeOwned + Send + 'static,
        O: Serialize + Send + 'static,
        F: Fn(I) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<O>> + Send + 'static,
    {
        let key = path.join(".");
        if self.procedures.contains_key(&key) {
            return Err(Error::DuplicateProcedure(key));
        }

        let handler = Arc::new(handler);
        let wrapped: Handler = Arc::new(move |raw: Value| {
            let handler = Arc::clone(&handler);
            Box::pin(async move {
                let input: I =
                    serde_json::from_value(raw).map_err(|e| Error::InvalidInput(e.to_string()))?;
                let output = handler(input).await?;
                Ok(serde_json::to_value(output)?)
            })
        });

        tracing::debug!(path = %key, "Registered procedure");
        self.procedures.insert(
            key,
            Procedure {
                description: description.to_string(),
                handler: wrapped,
            },
        );
        Ok(())
    }

    /// Dispatch a call to the procedure registered under `path`.
    pub async fn call(&self, path: &str, input: Value) -> Result<Value> {
        let procedure = self
            .procedures
            .get(path)
            .ok_or_else(|| Error::ProcedureNotFound(path.to_string()))?;
        (procedure.handler)(input).await
    }

    /// All registered dotted paths, sorted.
    pub fn paths(&self) -> Vec<&str> {
        self.procedures.keys().map(String::as_str).collect()
    }

    /// Description of the procedure at `path`, if registered.
    pub fn description(&self, path: &str) -> Option<&str> {
        self.procedures.get(path).map(|p| p.description.as_str())
    }
}
