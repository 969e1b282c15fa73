//! Gateway Metrics
//!
//! Counter exposition for the `/metrics` endpoint. Collectors live in a
//! crate-local registry (not the process-global default) so tests can hit
//! the endpoint repeatedly without duplicate-registration failures.

use once_cell::sync::Lazy;
use prometheus::{Encoder, IntCounter, Registry, TextEncoder};

static REGISTRY: Lazy<Registry> = Lazy::new(Registry::new);

/// Creates and registers one counter in the gateway registry.
///
/// Metric definitions are static; a failure here is a programming error.
fn counter(name: &str, help: &str) -> IntCounter {
    let counter = IntCounter::new(name, help).expect("valid metric definition");
    REGISTRY
        .register(Box::new(counter.clone()))
        .expect("unique metric registration");
    counter
}

/// Total intent envelopes received on POST /mcp/intent.
pub static INTENTS_RECEIVED: Lazy<IntCounter> = Lazy::new(|| {
    counter(
        "gateway_intents_received_total",
        "Total intent envelopes received.",
    )
});

/// Total envelopes refused by validation or JSON parsing.
pub static INTENTS_INVALID: Lazy<IntCounter> = Lazy::new(|| {
    counter(
        "gateway_intents_invalid_total",
        "Total envelopes refused by validation.",
    )
});

/// Total intents answered as queued (fire-and-forget direction).
pub static INTENTS_QUEUED: Lazy<IntCounter> = Lazy::new(|| {
    counter(
        "gateway_intents_queued_total",
        "Total intents accepted without finality confirmation.",
    )
});

/// Total intents confirmed finalized within the request budget.
pub static INTENTS_FINALIZED: Lazy<IntCounter> = Lazy::new(|| {
    counter(
        "gateway_intents_finalized_total",
        "Total intents confirmed finalized within budget.",
    )
});

/// Total intents rejected by the bridge (initiation or polling).
pub static INTENTS_REJECTED: Lazy<IntCounter> = Lazy::new(|| {
    counter(
        "gateway_intents_rejected_total",
        "Total intents rejected by the bridge.",
    )
});

/// Total intents whose finality polling exhausted its budget.
pub static INTENTS_TIMEOUT: Lazy<IntCounter> = Lazy::new(|| {
    counter(
        "gateway_intents_timeout_total",
        "Total intents that timed out waiting for finality.",
    )
});

/// Total unexpected errors converted into 500 responses.
pub static INTERNAL_ERRORS: Lazy<IntCounter> = Lazy::new(|| {
    counter(
        "gateway_internal_errors_total",
        "Total unexpected internal errors.",
    )
});

/// Renders the plaintext counter exposition.
///
/// # Returns
///
/// * `Ok(String)` - Prometheus text format for all gateway counters
/// * `Err(anyhow::Error)` - Encoding failed
pub fn render() -> anyhow::Result<String> {
    // Touch every collector so all series appear before their first
    // increment.
    Lazy::force(&INTENTS_RECEIVED);
    Lazy::force(&INTENTS_INVALID);
    Lazy::force(&INTENTS_QUEUED);
    Lazy::force(&INTENTS_FINALIZED);
    Lazy::force(&INTENTS_REJECTED);
    Lazy::force(&INTENTS_TIMEOUT);
    Lazy::force(&INTERNAL_ERRORS);

    let mut buffer = Vec::new();
    TextEncoder::new().encode(&REGISTRY.gather(), &mut buffer)?;
    Ok(String::from_utf8(buffer)?)
}
