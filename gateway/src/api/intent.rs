//! Intent intake and status handlers
//!
//! The per-request state machine:
//! 1. Validate the envelope (authoritative check). Failure: 400, terminal,
//!    no adapter call.
//! 2. Compute the direction from `chain.origin`, once.
//! 3. Initiate through the bridge adapter.
//! 4. For directions requiring finality, block within request scope on the
//!    polling loop and answer from its terminal receipt.
//! 5. Otherwise answer immediately with the initiation receipt's status.
//!
//! Any unexpected error in steps 2-4 is caught here and converted into a
//! generic 500 response; nothing propagates as a half-written reply.

use std::sync::Arc;
use tracing::{error, info, warn};
use warp::http::StatusCode;
use warp::hyper::body::Bytes;
use warp::reply::{Json, WithStatus};

use bridge_adapter::{AdapterError, BridgeAdapter, PollOptions};
use relay_types::{validate_envelope, Direction, Envelope, IntentStatus};

use super::generic::IntentResponse;
use crate::config::Config;
use crate::metrics;

/// Builds a JSON reply with the given HTTP status.
fn reply(status: StatusCode, response: &IntentResponse) -> WithStatus<Json> {
    warp::reply::with_status(warp::reply::json(response), status)
}

// ============================================================================
// INTENT INTAKE
// ============================================================================

/// Handler for `POST /mcp/intent`.
///
/// Parses and validates the envelope, then runs the fallible intent flow,
/// converting any unexpected error into the generic internal-error response.
pub async fn post_intent_handler(
    body: Bytes,
    config: Arc<Config>,
    adapter: Arc<BridgeAdapter>,
) -> Result<WithStatus<Json>, warp::Rejection> {
    metrics::INTENTS_RECEIVED.inc();

    let value: serde_json::Value = match serde_json::from_slice(&body) {
        Ok(value) => value,
        Err(e) => {
            warn!("Invalid intent JSON: {}", e);
            metrics::INTENTS_INVALID.inc();
            return Ok(reply(
                StatusCode::BAD_REQUEST,
                &IntentResponse::failed(format!("invalid JSON: {}", e)),
            ));
        }
    };

    let envelope = match validate_envelope(&value) {
        Ok(envelope) => envelope,
        Err(e) => {
            warn!("Invalid envelope: {}", e);
            metrics::INTENTS_INVALID.inc();
            return Ok(reply(
                StatusCode::BAD_REQUEST,
                &IntentResponse::failed(e.to_string()),
            ));
        }
    };

    info!(
        "Intent received: id={}, method={}, origin={}, destination={}",
        envelope.id, envelope.method, envelope.chain.origin, envelope.chain.destination
    );

    let intent_id = envelope.id.clone();
    match run_intent(envelope, &config, &adapter).await {
        Ok(response) => Ok(response),
        Err(e) => {
            error!("Intent error: id={}, err={}", intent_id, e);
            metrics::INTERNAL_ERRORS.inc();
            Ok(reply(
                StatusCode::INTERNAL_SERVER_ERROR,
                &IntentResponse::failed("internal_error"),
            ))
        }
    }
}

/// The fallible part of the intent flow (steps 2-5).
async fn run_intent(
    envelope: Envelope,
    config: &Config,
    adapter: &BridgeAdapter,
) -> anyhow::Result<WithStatus<Json>> {
    let direction = Direction::from_origin(envelope.chain.origin);
    let payload = envelope.to_payload_bytes()?;

    let receipt = adapter
        .initiate(direction, &payload, Some(envelope.id.clone()), None)
        .await;
    info!(
        "Intent queued: id={}, status={}, direction={}",
        envelope.id, receipt.status, direction
    );

    if receipt.status == IntentStatus::Rejected {
        metrics::INTENTS_REJECTED.inc();
        return Ok(reply(
            StatusCode::BAD_GATEWAY,
            &IntentResponse::failed_with_receipt(&receipt, "initiation rejected"),
        ));
    }

    if direction.requires_finality() {
        let options = PollOptions {
            max_wait_ms: config.adapter.max_wait_ms,
            poll_ms: config.adapter.poll_ms,
        };
        let finality = adapter.await_finality(&envelope.id, options).await;
        info!(
            "Finalize result: id={}, status={}",
            envelope.id, finality.status
        );

        if finality.status.is_success_terminal() {
            metrics::INTENTS_FINALIZED.inc();
            return Ok(reply(
                StatusCode::ACCEPTED,
                &IntentResponse::accepted(&finality.intent_id, finality.status),
            ));
        }

        if finality.error.as_deref() == Some("timeout") {
            metrics::INTENTS_TIMEOUT.inc();
        } else {
            metrics::INTENTS_REJECTED.inc();
        }
        return Ok(reply(
            StatusCode::GATEWAY_TIMEOUT,
            &IntentResponse::failed_with_receipt(&finality, "timeout"),
        ));
    }

    metrics::INTENTS_QUEUED.inc();
    Ok(reply(
        StatusCode::ACCEPTED,
        &IntentResponse::accepted(&receipt.intent_id, receipt.status),
    ))
}

// ============================================================================
// STATUS POLLING
// ============================================================================

/// Handler for `GET /mcp/status/:intent_id`.
///
/// Read-only lookup used by clients polling out-of-band for a terminal
/// result.
pub async fn get_status_handler(
    intent_id: String,
    adapter: Arc<BridgeAdapter>,
) -> Result<WithStatus<Json>, warp::Rejection> {
    match adapter.get_status(&intent_id).await {
        Ok(receipt) => Ok(reply(
            StatusCode::OK,
            &IntentResponse::accepted(&receipt.intent_id, receipt.status),
        )),
        Err(AdapterError::IntentNotFound(_)) => Ok(reply(
            StatusCode::NOT_FOUND,
            &IntentResponse::failed("not_found"),
        )),
        Err(e) => {
            error!("Status lookup failed: id={}, err={}", intent_id, e);
            metrics::INTERNAL_ERRORS.inc();
            Ok(reply(
                StatusCode::INTERNAL_SERVER_ERROR,
                &IntentResponse::failed("internal_error"),
            ))
        }
    }
}
