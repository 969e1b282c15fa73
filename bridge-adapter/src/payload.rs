//! Payload transport encoding
//!
//! Envelope bytes cross the adapter boundary in a tagged base64 form so the
//! encoding is self-describing and reversible on the far side.

use anyhow::{Context, Result};
use base64::{engine::general_purpose::STANDARD, Engine as _};

/// Prefix marking the transport encoding of a payload string.
const PAYLOAD_TAG: &str = "b64:";

/// Encodes raw payload bytes into the tagged base64 transport form.
pub fn encode_payload(bytes: &[u8]) -> String {
    format!("{}{}", PAYLOAD_TAG, STANDARD.encode(bytes))
}

/// Decodes a tagged base64 payload back into raw bytes.
///
/// # Arguments
///
/// * `encoded` - Payload string produced by [`encode_payload`]
///
/// # Returns
///
/// * `Ok(Vec<u8>)` - Original payload bytes
/// * `Err(anyhow::Error)` - Missing tag or invalid base64
pub fn decode_payload(encoded: &str) -> Result<Vec<u8>> {
    let body = encoded
        .strip_prefix(PAYLOAD_TAG)
        .with_context(|| format!("payload is not tagged with {:?}", PAYLOAD_TAG))?;
    STANDARD.decode(body).context("payload is not valid base64")
}
