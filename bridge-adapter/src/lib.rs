//! Bridge Adapter Library
//!
//! This crate provides the stateless dispatcher between the relay gateway
//! and the chain-specific bridge procedures. Given a routing direction and a
//! serialized payload it initiates a cross-chain transfer and returns a
//! receipt; separately it exposes a polling operation that advances the
//! receipt through the bridge-side milestones (prove, then finalize) until a
//! terminal state or a wall-clock deadline.
//!
//! Business-level failures never escape the adapter boundary: callers of
//! `initiate` and `await_finality` always receive a receipt, never an error.

pub mod adapter;
pub mod error;
pub mod payload;
pub mod procedures;
pub mod receipts;
pub mod rpc;

// Re-export commonly used types
pub use adapter::{BridgeAdapter, PollOptions};
pub use error::AdapterError;
pub use procedures::{ChainProcedures, ProcedureOutcome, ProcedureRegistry};
pub use receipts::{InFlightIntent, ReceiptStore};
pub use rpc::RpcBridgeClient;
