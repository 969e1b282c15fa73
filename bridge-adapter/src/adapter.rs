//! Bridge Adapter Core
//!
//! Orchestrates one intent's chain-side lifecycle: initiation dispatch by
//! direction, the bounded prove/finalize polling loop, and read-only status
//! lookups. Each intent has a single logical flow of control; the only state
//! shared across intents is the receipt store, which is keyed per intent.

use rand::RngCore;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use relay_types::{Direction, IntentStatus, NoopObserver, Receipt, RelayObserver};

use crate::error::AdapterError;
use crate::payload;
use crate::procedures::{ChainProcedures, ProcedureRegistry};
use crate::receipts::{InFlightIntent, ReceiptStore};

/// Default budget for one chain initiation call.
const DEFAULT_INITIATE_TIMEOUT_MS: u64 = 30_000;

/// Default overall finality polling budget (15 minutes).
const DEFAULT_MAX_WAIT_MS: u64 = 900_000;

/// Default interval between prove/finalize attempts.
const DEFAULT_POLL_MS: u64 = 5_000;

// ============================================================================
// POLL OPTIONS
// ============================================================================

/// Budgets for the finality polling loop.
///
/// `max_wait_ms` is a wall-clock deadline measured from loop entry; on
/// expiry the loop returns a terminal `REJECTED`/`timeout` receipt rather
/// than retrying indefinitely.
#[derive(Debug, Clone, Copy)]
pub struct PollOptions {
    /// Overall wall-clock budget in milliseconds
    pub max_wait_ms: u64,
    /// Interval between attempts in milliseconds
    pub poll_ms: u64,
}

impl Default for PollOptions {
    fn default() -> Self {
        Self {
            max_wait_ms: DEFAULT_MAX_WAIT_MS,
            poll_ms: DEFAULT_POLL_MS,
        }
    }
}

// ============================================================================
// BRIDGE ADAPTER
// ============================================================================

/// Stateless dispatcher between the gateway and the chain procedures.
///
/// Business-level failures (missing registration, transport errors,
/// timeouts) are converted into rejection receipts at this boundary;
/// `initiate` and `await_finality` never return an error to their callers.
pub struct BridgeAdapter {
    /// Direction-keyed chain procedure sets
    registry: ProcedureRegistry,
    /// Per-intent receipt records
    receipts: ReceiptStore,
    /// Lifecycle event sink, injected at construction
    observer: Arc<dyn RelayObserver>,
}

impl BridgeAdapter {
    /// Creates an adapter over the given procedure registry.
    ///
    /// Lifecycle events are discarded until an observer is attached with
    /// [`BridgeAdapter::with_observer`].
    pub fn new(registry: ProcedureRegistry) -> Self {
        Self {
            registry,
            receipts: ReceiptStore::new(),
            observer: Arc::new(NoopObserver),
        }
    }

    /// Attaches a lifecycle observer.
    pub fn with_observer(mut self, observer: Arc<dyn RelayObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Initiates a cross-chain transfer for the given direction.
    ///
    /// The payload is wrapped in its transport encoding and handed to the
    /// chain initiation procedure under a timeout. Every failure mode is
    /// folded into the returned receipt: callers always receive a receipt,
    /// never an error.
    ///
    /// Re-submitting an id whose lifecycle is still running (or already
    /// succeeded) returns the existing receipt without touching the chain
    /// again; a rejected id may be re-initiated fresh.
    ///
    /// # Arguments
    ///
    /// * `direction` - Routing direction computed at envelope intake
    /// * `payload` - Serialized envelope bytes
    /// * `intent_id` - Caller-assigned id; generated when omitted
    /// * `timeout_ms` - Budget for the initiation call (default 30 000 ms)
    ///
    /// # Returns
    ///
    /// The receipt recorded for this intent (`QUEUED`/`SENT` on success,
    /// `REJECTED` with an error otherwise).
    pub async fn initiate(
        &self,
        direction: Direction,
        payload: &[u8],
        intent_id: Option<String>,
        timeout_ms: Option<u64>,
    ) -> Receipt {
        let intent_id = intent_id.unwrap_or_else(generate_intent_id);

        if let Some(existing) = self.receipts.get(&intent_id).await {
            if existing.receipt.status != IntentStatus::Rejected {
                debug!(
                    "Intent {} already in flight with status {}, returning existing receipt",
                    intent_id, existing.receipt.status
                );
                return existing.receipt;
            }
        }

        let procedures = match self.registry.get(direction) {
            Ok(procedures) => procedures,
            Err(e) => {
                let receipt = Receipt::rejected(&intent_id, e.to_string());
                self.receipts.put(direction, receipt.clone()).await;
                self.emit("intent.rejected", direction, &receipt);
                return receipt;
            }
        };

        let payload_b64 = payload::encode_payload(payload);
        let budget = Duration::from_millis(timeout_ms.unwrap_or(DEFAULT_INITIATE_TIMEOUT_MS));

        let receipt =
            match tokio::time::timeout(budget, procedures.initiate(&intent_id, &payload_b64)).await
            {
                Ok(Ok(outcome)) => {
                    let mut receipt = Receipt::queued(&intent_id);
                    if let Some(tx_id) = outcome.tx_id {
                        receipt.record_tx(tx_id);
                    }
                    if receipt.advance(outcome.status)
                        && outcome.status == IntentStatus::Rejected
                    {
                        receipt.record_error("rejected by chain initiation");
                    }
                    receipt
                }
                Ok(Err(e)) => Receipt::rejected(&intent_id, format!("initiate failed: {}", e)),
                Err(_) => Receipt::rejected(&intent_id, "initiate timed out"),
            };

        self.receipts.put(direction, receipt.clone()).await;

        if receipt.status == IntentStatus::Rejected {
            warn!(
                "Initiation rejected for intent {} ({}): {}",
                intent_id,
                direction,
                receipt.error.as_deref().unwrap_or("unknown")
            );
            self.emit("intent.rejected", direction, &receipt);
        } else {
            info!(
                "Initiated intent {} ({}) with status {}",
                intent_id, direction, receipt.status
            );
            self.emit("intent.initiated", direction, &receipt);
        }

        receipt
    }

    /// Polls the bridge through the prove and finalize milestones until the
    /// intent reaches a terminal state or the wall-clock budget expires.
    ///
    /// The deadline is checked before every attempt, so a zero budget times
    /// out without a single procedure call. Between attempts the loop
    /// suspends for the poll interval (never longer than the remaining
    /// budget); transient procedure failures are logged and retried.
    ///
    /// # Arguments
    ///
    /// * `intent_id` - Intent to advance
    /// * `options` - Polling budgets (defaults: 900 000 ms / 5 000 ms)
    ///
    /// # Returns
    ///
    /// The terminal (or timeout) receipt. `REJECTED` with `error: "timeout"`
    /// when the budget expires first.
    pub async fn await_finality(&self, intent_id: &str, options: PollOptions) -> Receipt {
        let entry = match self.receipts.get(intent_id).await {
            Some(entry) => entry,
            None => return Receipt::rejected(intent_id, "unknown intent"),
        };
        if entry.receipt.status.is_terminal() {
            return entry.receipt;
        }

        let InFlightIntent { direction, receipt } = entry;
        let procedures = match self.registry.get(direction) {
            Ok(procedures) => procedures,
            Err(e) => {
                let receipt = self.reject(intent_id, &e.to_string()).await;
                self.emit("intent.rejected", direction, &receipt);
                return receipt;
            }
        };

        let start = Instant::now();
        let max_wait = Duration::from_millis(options.max_wait_ms);
        let poll = Duration::from_millis(options.poll_ms.max(1));
        let mut proven = receipt.status == IntentStatus::Proven;

        loop {
            if start.elapsed() >= max_wait {
                info!("Finality polling timed out for intent {}", intent_id);
                let receipt = self.reject(intent_id, "timeout").await;
                self.emit("intent.timeout", direction, &receipt);
                return receipt;
            }

            if !proven {
                match procedures.prove(intent_id).await {
                    Ok(outcome) => {
                        if outcome.status == IntentStatus::Rejected {
                            let receipt = self.reject(intent_id, "rejected during prove").await;
                            self.emit("intent.rejected", direction, &receipt);
                            return receipt;
                        }
                        let updated = self
                            .receipts
                            .observe(intent_id, outcome.status, outcome.tx_id, None)
                            .await;
                        if outcome.status.is_success_terminal() {
                            // Bridge skipped straight past the finalize step.
                            let receipt = updated
                                .unwrap_or_else(|| Receipt::queued(intent_id));
                            info!(
                                "Intent {} reached {} during prove",
                                intent_id, receipt.status
                            );
                            self.emit("intent.finalized", direction, &receipt);
                            return receipt;
                        }
                        if outcome.status == IntentStatus::Proven {
                            info!("Intent {} proven", intent_id);
                            proven = true;
                            if let Some(receipt) = updated {
                                self.emit("intent.proven", direction, &receipt);
                            }
                        }
                    }
                    Err(e) => {
                        warn!("Prove attempt failed for intent {}: {}", intent_id, e);
                    }
                }
            }

            if proven {
                match procedures.finalize(intent_id).await {
                    Ok(outcome) => {
                        if outcome.status == IntentStatus::Rejected {
                            let receipt =
                                self.reject(intent_id, "rejected during finalize").await;
                            self.emit("intent.rejected", direction, &receipt);
                            return receipt;
                        }
                        if outcome.status.is_success_terminal() {
                            let receipt = self
                                .receipts
                                .observe(intent_id, outcome.status, outcome.tx_id, None)
                                .await
                                .unwrap_or_else(|| Receipt::queued(intent_id));
                            info!("Intent {} finalized as {}", intent_id, receipt.status);
                            self.emit("intent.finalized", direction, &receipt);
                            return receipt;
                        }
                    }
                    Err(e) => {
                        warn!("Finalize attempt failed for intent {}: {}", intent_id, e);
                    }
                }
            }

            let remaining = max_wait.saturating_sub(start.elapsed());
            tokio::time::sleep(poll.min(remaining)).await;
        }
    }

    /// Best-effort read of an intent's current status.
    ///
    /// Performs the read-only chain status procedure and folds the
    /// observation into the stored receipt monotonically; a failed read
    /// returns the cached receipt unchanged. Side-effect-free with respect
    /// to the underlying chain, and idempotent: two consecutive calls with
    /// no intervening state change return identical receipts.
    ///
    /// # Arguments
    ///
    /// * `intent_id` - Intent to look up
    ///
    /// # Returns
    ///
    /// * `Ok(Receipt)` - Current receipt
    /// * `Err(AdapterError::IntentNotFound)` - Id was never initiated here
    pub async fn get_status(&self, intent_id: &str) -> Result<Receipt, AdapterError> {
        let entry = self
            .receipts
            .get(intent_id)
            .await
            .ok_or_else(|| AdapterError::IntentNotFound(intent_id.to_string()))?;

        if entry.receipt.status.is_terminal() {
            return Ok(entry.receipt);
        }

        let procedures = self.registry.get(entry.direction)?;
        match procedures.status(intent_id).await {
            Ok(outcome) => {
                let receipt = self
                    .receipts
                    .observe(intent_id, outcome.status, outcome.tx_id, None)
                    .await
                    .unwrap_or(entry.receipt);
                Ok(receipt)
            }
            Err(e) => {
                debug!(
                    "Status read failed for intent {}, returning cached receipt: {}",
                    intent_id, e
                );
                Ok(entry.receipt)
            }
        }
    }

    /// Records a terminal rejection for an intent and returns the receipt.
    async fn reject(&self, intent_id: &str, error: &str) -> Receipt {
        self.receipts
            .observe(
                intent_id,
                IntentStatus::Rejected,
                None,
                Some(error.to_string()),
            )
            .await
            .unwrap_or_else(|| Receipt::rejected(intent_id, error))
    }

    /// Emits one lifecycle event to the injected observer.
    fn emit(&self, name: &str, direction: Direction, receipt: &Receipt) {
        self.observer.on_event(
            name,
            &json!({
                "intentId": receipt.intent_id,
                "direction": direction,
                "status": receipt.status,
                "txId": receipt.tx_id,
                "error": receipt.error,
            }),
        );
    }
}

/// Generates a fresh intent id: 32 random bytes, hex, `0x`-prefixed.
fn generate_intent_id() -> String {
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    format!("0x{}", hex::encode(bytes))
}
