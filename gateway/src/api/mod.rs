//! REST API Server Module
//!
//! This module provides the HTTP surface of the gateway: intent intake,
//! out-of-band status polling, liveness, and metrics exposition.

// Generic shared code (server, routes, rejection handling)
mod generic;

// Intent intake and status handlers (the request state machine)
mod intent;

// Re-export ApiServer for convenience
pub use generic::ApiServer;
// Re-export IntentResponse for testing
#[allow(unused_imports)]
pub use generic::IntentResponse;
