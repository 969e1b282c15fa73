//! Adapter error types

use relay_types::Direction;

/// Typed failures at the adapter boundary.
///
/// `initiate` and `await_finality` convert these into rejection receipts;
/// only `get_status` surfaces them to callers, so the gateway can map an
/// unknown intent to a 404 instead of a receipt.
#[derive(Debug, thiserror::Error)]
pub enum AdapterError {
    /// No chain procedures were registered for the requested direction
    #[error("no chain procedures registered for direction {0}")]
    ProceduresNotFound(Direction),

    /// A second registration was attempted for an already-covered direction
    #[error("chain procedures already registered for direction {0}")]
    DuplicateProcedures(Direction),

    /// The intent id is not present in the receipt store
    #[error("unknown intent: {0}")]
    IntentNotFound(String),
}
