//! In-Memory Receipt Store
//!
//! The receipt is the only in-flight state of an intent. This store keeps it
//! keyed by intent id together with the direction computed at intake time,
//! so downstream steps never re-derive routing from the envelope.
//!
//! All status mutation funnels through [`relay_types::Receipt::advance`],
//! which makes every observation fold monotonic: stale reads are ignored and
//! terminal receipts are immutable. A production deployment would back this
//! with a durable key-value store; the contract here is unaffected by that
//! choice.

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use relay_types::{Direction, IntentStatus, Receipt};

/// One intent's in-flight record: its intake-time direction and receipt.
#[derive(Debug, Clone)]
pub struct InFlightIntent {
    /// Routing direction computed once at envelope intake
    pub direction: Direction,
    /// Current receipt
    pub receipt: Receipt,
}

/// Shared, per-intent-keyed receipt store.
#[derive(Clone, Default)]
pub struct ReceiptStore {
    inner: Arc<RwLock<HashMap<String, InFlightIntent>>>,
}

impl ReceiptStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Inserts or replaces the record for a receipt's intent id.
    pub async fn put(&self, direction: Direction, receipt: Receipt) {
        let mut receipts = self.inner.write().await;
        receipts.insert(
            receipt.intent_id.clone(),
            InFlightIntent { direction, receipt },
        );
    }

    /// Returns a copy of the record for an intent id.
    pub async fn get(&self, intent_id: &str) -> Option<InFlightIntent> {
        let receipts = self.inner.read().await;
        receipts.get(intent_id).cloned()
    }

    /// Folds a bridge-side observation into the stored receipt.
    ///
    /// The receipt only ever moves forward: regressions and post-terminal
    /// observations leave it untouched. A transaction id is recorded on a
    /// first-write-wins basis even when the status itself is stale.
    ///
    /// # Arguments
    ///
    /// * `intent_id` - Intent whose receipt to update
    /// * `status` - Newly observed status
    /// * `tx_id` - Transaction id reported with the observation, if any
    /// * `error` - Failure reason, recorded only when `status` is `REJECTED`
    ///
    /// # Returns
    ///
    /// * `Some(Receipt)` - Updated receipt copy
    /// * `None` - Unknown intent id
    pub async fn observe(
        &self,
        intent_id: &str,
        status: IntentStatus,
        tx_id: Option<String>,
        error: Option<String>,
    ) -> Option<Receipt> {
        let mut receipts = self.inner.write().await;
        let entry = receipts.get_mut(intent_id)?;

        if let Some(tx_id) = tx_id {
            entry.receipt.record_tx(tx_id);
        }
        if entry.receipt.advance(status) && status == IntentStatus::Rejected {
            entry
                .receipt
                .record_error(error.unwrap_or_else(|| "rejected".to_string()));
        }

        Some(entry.receipt.clone())
    }
}
