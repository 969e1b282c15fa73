//! Receipt and Status Model
//!
//! The receipt is the mutable progress record for one intent's cross-chain
//! execution. It is owned by the bridge adapter during the initiate/poll
//! phases and read-only once handed to the gateway or a client.
//!
//! Status advances monotonically through a fixed order and freezes at the
//! first terminal state. All mutation goes through [`Receipt::advance`], so
//! no caller can regress a receipt or resurrect a terminal one.

use serde::{Deserialize, Serialize};

// ============================================================================
// STATUS
// ============================================================================

/// Progress states of one intent, in lifecycle order.
///
/// `QUEUED < SENT < PROVEN < FINALIZED < EXECUTED`; `REJECTED` is the
/// terminal failure state, reachable only from a non-terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IntentStatus {
    /// Accepted by the adapter, not yet handed to the chain
    Queued,
    /// Handed to the origin chain
    Sent,
    /// Proof landed on the destination chain
    Proven,
    /// Destination chain confirmed finality
    Finalized,
    /// Destination chain executed the intent
    Executed,
    /// Terminal failure (transport error, rejection, or timeout)
    Rejected,
}

impl IntentStatus {
    /// Position in the fixed lifecycle order. `Rejected` outranks every
    /// non-terminal state so that it can replace any of them.
    fn rank(self) -> u8 {
        match self {
            IntentStatus::Queued => 0,
            IntentStatus::Sent => 1,
            IntentStatus::Proven => 2,
            IntentStatus::Finalized => 3,
            IntentStatus::Executed => 4,
            IntentStatus::Rejected => 5,
        }
    }

    /// Whether the status is terminal (success or failure).
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            IntentStatus::Finalized | IntentStatus::Executed | IntentStatus::Rejected
        )
    }

    /// Whether the status is a successful terminal state.
    pub fn is_success_terminal(self) -> bool {
        matches!(self, IntentStatus::Finalized | IntentStatus::Executed)
    }

    /// Canonical wire name of the status (e.g. `"FINALIZED"`).
    pub fn as_str(&self) -> &'static str {
        match self {
            IntentStatus::Queued => "QUEUED",
            IntentStatus::Sent => "SENT",
            IntentStatus::Proven => "PROVEN",
            IntentStatus::Finalized => "FINALIZED",
            IntentStatus::Executed => "EXECUTED",
            IntentStatus::Rejected => "REJECTED",
        }
    }
}

impl std::fmt::Display for IntentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// RECEIPT
// ============================================================================

/// The mutable state of one intent's cross-chain progress.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Receipt {
    /// Correlates to the envelope `id`
    pub intent_id: String,
    /// Chain transaction identifier, set once available
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tx_id: Option<String>,
    /// Current lifecycle status
    pub status: IntentStatus,
    /// Failure reason, set only when status is `REJECTED`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Receipt {
    /// Creates the initial receipt for a freshly initiated intent.
    pub fn queued(intent_id: impl Into<String>) -> Self {
        Self {
            intent_id: intent_id.into(),
            tx_id: None,
            status: IntentStatus::Queued,
            error: None,
        }
    }

    /// Creates a terminal rejection receipt with a failure reason.
    pub fn rejected(intent_id: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            intent_id: intent_id.into(),
            tx_id: None,
            status: IntentStatus::Rejected,
            error: Some(error.into()),
        }
    }

    /// Attempts to advance the receipt to `next`.
    ///
    /// Stale observations are ignored rather than treated as errors: a
    /// regression, a repeat of the current status, or any change after a
    /// terminal state leaves the receipt untouched.
    ///
    /// # Arguments
    ///
    /// * `next` - Newly observed status
    ///
    /// # Returns
    ///
    /// * `true` - The receipt advanced to `next`
    /// * `false` - Observation was stale; receipt unchanged
    pub fn advance(&mut self, next: IntentStatus) -> bool {
        if self.status.is_terminal() {
            return false;
        }
        if next.rank() <= self.status.rank() {
            return false;
        }
        self.status = next;
        true
    }

    /// Records the chain transaction identifier, first observation wins.
    pub fn record_tx(&mut self, tx_id: impl Into<String>) {
        if self.tx_id.is_none() {
            self.tx_id = Some(tx_id.into());
        }
    }

    /// Records a failure reason. Only meaningful alongside `REJECTED`.
    pub fn record_error(&mut self, error: impl Into<String>) {
        self.error = Some(error.into());
    }
}
