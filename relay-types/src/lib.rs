//! Shared Types for the Intent Relay
//!
//! This crate defines the contract shared by the gateway, the bridge adapter,
//! and the client SDK: the intent envelope and its validation rule-set, the
//! receipt/status lifecycle model, the routing direction, and the observer
//! hook for lifecycle events.
//!
//! The validation rule-set lives here exactly once so that the gateway
//! (authoritative check) and the client SDK (pre-flight check) cannot drift.

pub mod direction;
pub mod envelope;
pub mod observer;
pub mod receipt;

// Re-export commonly used types
pub use direction::Direction;
pub use envelope::{validate_envelope, ChainNetwork, ChainRoute, Envelope, ValidationError};
pub use observer::{NoopObserver, RelayObserver};
pub use receipt::{IntentStatus, Receipt};
