//! Lifecycle Observer Hook
//!
//! Lifecycle events (initiated, proven, finalized, rejected, timeout) are
//! reported through an observer injected at construction time rather than a
//! process-wide event bus, so tests can assert on emissions without shared
//! mutable state.

use serde_json::Value;

/// Receiver for intent lifecycle events.
///
/// Implementations must be cheap and non-blocking; the adapter calls them
/// inline on its hot path.
pub trait RelayObserver: Send + Sync {
    /// Called once per lifecycle event.
    ///
    /// # Arguments
    ///
    /// * `name` - Event name, e.g. `"intent.finalized"`
    /// * `payload` - Event payload (intent id, status, direction, ...)
    fn on_event(&self, name: &str, payload: &Value);
}

/// Observer that discards all events. Default for tests and embedders that
/// do not care about lifecycle emissions.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl RelayObserver for NoopObserver {
    fn on_event(&self, _name: &str, _payload: &Value) {}
}
