//! Intent Envelope Module
//!
//! This module defines the envelope submitted by callers to describe a
//! cross-chain action, and the ordered validation rule-set applied to raw
//! request bodies before anything else touches them.
//!
//! Validation is a pure function over a `serde_json::Value`: the gateway runs
//! it as the authoritative check at the HTTP boundary, and the client SDK
//! runs the same function as a pre-flight check before transmitting. Invalid
//! envelopes never reach the bridge adapter.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The only accepted envelope discriminator.
pub const ENVELOPE_KIND_REQUEST: &str = "request";

// ============================================================================
// CHAIN IDENTIFIERS
// ============================================================================

/// Fixed set of chain identifiers the relay routes between.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChainNetwork {
    /// Base (EVM) network
    Base,
    /// Solana (SVM) network
    Solana,
}

impl ChainNetwork {
    /// Returns the canonical wire name of the network.
    pub fn as_str(&self) -> &'static str {
        match self {
            ChainNetwork::Base => "Base",
            ChainNetwork::Solana => "Solana",
        }
    }

    /// Parses a canonical wire name into a network.
    ///
    /// # Arguments
    ///
    /// * `value` - Wire name, e.g. "Base" or "Solana"
    ///
    /// # Returns
    ///
    /// * `Some(ChainNetwork)` - Known network
    /// * `None` - Unknown network name
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "Base" => Some(ChainNetwork::Base),
            "Solana" => Some(ChainNetwork::Solana),
            _ => None,
        }
    }
}

impl std::fmt::Display for ChainNetwork {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// ENVELOPE STRUCTURES
// ============================================================================

/// Chain annotation carried by every envelope.
///
/// `executor` and `signature` are opaque authorization material: the relay
/// threads them through to the chain procedures without interpreting them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainRoute {
    /// Origin chain of the intent
    pub origin: ChainNetwork,
    /// Destination chain of the intent
    pub destination: ChainNetwork,
    /// Address authorized to act on the intent
    pub executor: String,
    /// Opaque authorization token/signature
    pub signature: String,
    /// Optional unix-seconds expiry
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deadline: Option<u64>,
    /// Optional replay-protection nonce
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nonce: Option<String>,
}

/// The unit of intent submitted by a caller.
///
/// `id` is the caller-assigned idempotency/correlation key for the entire
/// lifecycle. `method` and `params` are opaque to the relay core.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    /// Fixed discriminator, must equal `"request"`
    #[serde(rename = "type")]
    pub kind: String,
    /// Caller-assigned unique identifier
    pub id: String,
    /// Logical operation requested (opaque to the relay)
    pub method: String,
    /// Opaque payload for the downstream action
    pub params: serde_json::Map<String, Value>,
    /// Chain routing and authorization annotation
    pub chain: ChainRoute,
}

impl Envelope {
    /// Deterministic byte encoding of the envelope for adapter transport.
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<u8>)` - Canonical JSON bytes of the envelope
    /// * `Err(serde_json::Error)` - Envelope could not be serialized
    pub fn to_payload_bytes(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }
}

// ============================================================================
// VALIDATION
// ============================================================================

/// Error describing why an envelope was rejected at the boundary.
///
/// Always recovered locally (a `400`-class response or `ok: false` result);
/// never reaches the bridge adapter.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ValidationError {
    /// Human-readable description of the first failing check
    pub message: String,
}

impl ValidationError {
    /// Creates a validation error from a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Validates the shape and required fields of an intent envelope.
///
/// Checks are applied in a fixed order and short-circuit on the first
/// failure:
/// 1. body is a JSON object
/// 2. `type` equals `"request"`
/// 3. `id` is a non-empty string
/// 4. `method` is a non-empty string
/// 5. `params` is an object
/// 6. `chain` is an object
/// 7. `chain.origin`/`chain.destination` name known networks, and
///    `chain.executor`/`chain.signature` are non-empty strings
///
/// `origin != destination` is deliberately not enforced, and `deadline` is
/// not checked against the current time.
///
/// # Arguments
///
/// * `body` - Raw JSON request body
///
/// # Returns
///
/// * `Ok(Envelope)` - Parsed, schema-conforming envelope
/// * `Err(ValidationError)` - First failing check, as a renderable message
pub fn validate_envelope(body: &Value) -> Result<Envelope, ValidationError> {
    let obj = body
        .as_object()
        .ok_or_else(|| ValidationError::new("body must be an object"))?;

    match obj.get("type").and_then(Value::as_str) {
        Some(ENVELOPE_KIND_REQUEST) => {}
        _ => return Err(ValidationError::new("type must be \"request\"")),
    }

    match obj.get("id").and_then(Value::as_str) {
        Some(id) if !id.is_empty() => {}
        _ => return Err(ValidationError::new("id is required")),
    }

    match obj.get("method").and_then(Value::as_str) {
        Some(method) if !method.is_empty() => {}
        _ => return Err(ValidationError::new("method is required")),
    }

    if !obj.get("params").map(Value::is_object).unwrap_or(false) {
        return Err(ValidationError::new("params must be an object"));
    }

    let chain = obj
        .get("chain")
        .and_then(Value::as_object)
        .ok_or_else(|| ValidationError::new("chain is required"))?;

    for field in ["origin", "destination", "executor", "signature"] {
        match chain.get(field).and_then(Value::as_str) {
            Some(value) if !value.is_empty() => {}
            _ => {
                return Err(ValidationError::new(format!(
                    "chain fields missing: chain.{} is required",
                    field
                )))
            }
        }
    }

    for field in ["origin", "destination"] {
        let name = chain.get(field).and_then(Value::as_str).unwrap_or_default();
        if ChainNetwork::parse(name).is_none() {
            return Err(ValidationError::new(format!(
                "chain.{} must be one of: Base, Solana",
                field
            )));
        }
    }

    // All shape checks passed; remaining type mismatches (e.g. a non-numeric
    // deadline) surface through the schema deserialization itself.
    serde_json::from_value::<Envelope>(body.clone())
        .map_err(|e| ValidationError::new(format!("envelope does not match schema: {}", e)))
}
