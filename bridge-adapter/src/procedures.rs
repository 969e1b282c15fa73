//! Chain Procedure Contract and Registry
//!
//! The chain-specific side of the bridge is consumed through a narrow
//! procedure contract: one initiation call per intent, repeated prove and
//! finalize attempts during finality polling, and a read-only status lookup.
//! The network a procedure set talks to is fixed at construction time.
//!
//! Procedure sets are selected through a registry keyed by routing direction.
//! Registration is validated (no duplicates) and lookup fails with a typed
//! error instead of an unconstrained map access.

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

use relay_types::{Direction, IntentStatus};

use crate::error::AdapterError;

// ============================================================================
// PROCEDURE CONTRACT
// ============================================================================

/// Result of one chain procedure invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcedureOutcome {
    /// Bridge-reported lifecycle status
    pub status: IntentStatus,
    /// Chain transaction identifier, when one exists
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tx_id: Option<String>,
}

/// Chain-specific bridge procedures for one routing direction.
///
/// Implementations talk to exactly one network, fixed at construction.
/// `prove` and `finalize` are invoked repeatedly by the polling loop and
/// must be safe to retry; `status` must be read-only with respect to the
/// underlying chain.
#[async_trait]
pub trait ChainProcedures: Send + Sync {
    /// Hands a serialized intent payload to the chain-side initiation
    /// procedure. Invoked once per `initiate` call.
    async fn initiate(&self, intent_id: &str, payload_b64: &str) -> Result<ProcedureOutcome>;

    /// Attempts the proof step. Reports `PROVEN` (or later) once the proof
    /// has landed; earlier statuses mean "not yet".
    async fn prove(&self, intent_id: &str) -> Result<ProcedureOutcome>;

    /// Attempts the finalize step. Reports `FINALIZED` or `EXECUTED` once
    /// the destination chain has committed the transfer.
    async fn finalize(&self, intent_id: &str) -> Result<ProcedureOutcome>;

    /// Reads the current bridge-side status without advancing it.
    async fn status(&self, intent_id: &str) -> Result<ProcedureOutcome>;
}

// ============================================================================
// PROCEDURE REGISTRY
// ============================================================================

/// Direction-keyed registry of chain procedure sets.
#[derive(Clone, Default)]
pub struct ProcedureRegistry {
    procedures: HashMap<Direction, Arc<dyn ChainProcedures>>,
}

impl ProcedureRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            procedures: HashMap::new(),
        }
    }

    /// Registers the procedure set for a direction.
    ///
    /// # Arguments
    ///
    /// * `direction` - Routing direction the procedures serve
    /// * `procedures` - Procedure set talking to that direction's bridge
    ///
    /// # Returns
    ///
    /// * `Ok(())` - Registered
    /// * `Err(AdapterError::DuplicateProcedures)` - Direction already covered
    pub fn register(
        &mut self,
        direction: Direction,
        procedures: Arc<dyn ChainProcedures>,
    ) -> Result<(), AdapterError> {
        if self.procedures.contains_key(&direction) {
            return Err(AdapterError::DuplicateProcedures(direction));
        }
        self.procedures.insert(direction, procedures);
        Ok(())
    }

    /// Resolves the procedure set for a direction.
    ///
    /// # Returns
    ///
    /// * `Ok(Arc<dyn ChainProcedures>)` - Registered procedure set
    /// * `Err(AdapterError::ProceduresNotFound)` - Direction not covered
    pub fn get(&self, direction: Direction) -> Result<Arc<dyn ChainProcedures>, AdapterError> {
        self.procedures
            .get(&direction)
            .cloned()
            .ok_or(AdapterError::ProceduresNotFound(direction))
    }
}
