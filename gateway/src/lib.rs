//! Gateway Service Library
//!
//! This crate provides the HTTP-facing orchestrator of the intent relay:
//! it validates incoming envelopes, computes the routing direction, invokes
//! the bridge adapter, and, for directions requiring multi-step finality,
//! blocks within request scope on the finality polling loop before
//! responding. Malformed envelopes never reach the adapter.

pub mod api;
pub mod config;
pub mod metrics;

// Re-export commonly used types
pub use api::{ApiServer, IntentResponse};
pub use config::{AdapterConfig, ApiConfig, ChainEndpointConfig, ChainsConfig, Config};
