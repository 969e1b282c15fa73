//! Client SDK Library
//!
//! This crate provides the caller-side client of the intent relay: it
//! validates envelopes locally against the same rule-set the gateway
//! enforces, submits them to `POST /mcp/intent`, and polls the gateway's
//! status endpoint until a terminal result.
//!
//! Every operation returns an [`IntentResult`] and never an error: local
//! validation failures, transport errors, and timeouts are all folded into
//! `ok: false` results.

pub mod client;

// Re-export commonly used types
pub use client::{IntentResult, PollOptions, RelayClient, RelayClientOptions};
pub use relay_types::{ChainNetwork, ChainRoute, Envelope, IntentStatus};
