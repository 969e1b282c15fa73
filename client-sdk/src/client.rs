//! Relay Gateway HTTP Client
//!
//! HTTP client for submitting intent envelopes to the gateway and polling
//! for their terminal result. Envelopes are validated locally with the
//! shared rule-set before any network call; invalid envelopes are refused
//! without touching the wire.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;

use relay_types::{validate_envelope, Envelope, IntentStatus};

/// Default per-request timeout.
const DEFAULT_TIMEOUT_MS: u64 = 60_000;

/// Default overall await_result budget (15 minutes).
const DEFAULT_MAX_WAIT_MS: u64 = 900_000;

/// Default interval between status polls.
const DEFAULT_POLL_MS: u64 = 5_000;

// ============================================================================
// RESULT AND OPTION STRUCTURES
// ============================================================================

/// Result of one SDK operation: `{ok, id?, status?, error?}`.
///
/// Mirrors the gateway's intent response body; the SDK never raises, so
/// every failure mode arrives here with `ok: false` and an error string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntentResult {
    /// Whether the operation succeeded
    pub ok: bool,
    /// Intent id, when known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Lifecycle status reported by the gateway
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<IntentStatus>,
    /// Error message (if failed)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl IntentResult {
    /// Failure result carrying only an error message.
    fn failed(error: impl Into<String>) -> Self {
        Self {
            ok: false,
            id: None,
            status: None,
            error: Some(error.into()),
        }
    }
}

/// Budgets for [`RelayClient::await_result`] polling.
///
/// The client-side deadline is independent of any server-side polling
/// budget: on expiry the SDK synthesizes its own `REJECTED`/`timeout`
/// result.
#[derive(Debug, Clone, Copy)]
pub struct PollOptions {
    /// Overall wall-clock budget in milliseconds
    pub max_wait_ms: u64,
    /// Interval between status polls in milliseconds
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

/// Options for constructing a [`RelayClient`].
#[derive(Debug, Clone)]
pub struct RelayClientOptions {
    /// Gateway base URL, e.g. "http://127.0.0.1:8080"
    pub base_url: String,
    /// Optional bearer token attached to every request
    pub api_key: Option<String>,
    /// Per-request timeout in milliseconds (default 60 000)
    pub timeout_ms: Option<u64>,
}

// ============================================================================
// RELAY CLIENT
// ============================================================================

/// HTTP client for the relay gateway.
pub struct RelayClient {
    /// Gateway base URL with trailing slashes trimmed
    base_url: String,
    /// Optional bearer token
    api_key: Option<String>,
    /// HTTP client instance
    client: reqwest::Client,
}

impl RelayClient {
    /// Creates a new gateway client.
    ///
    /// # Arguments
    ///
    /// * `options` - Base URL, optional api key, optional request timeout
    ///
    /// # Returns
    ///
    /// * `RelayClient` - New client instance
    pub fn new(options: RelayClientOptions) -> Self {
        let timeout = Duration::from_millis(options.timeout_ms.unwrap_or(DEFAULT_TIMEOUT_MS));
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .no_proxy() // Avoid macOS system-configuration issues in tests
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url: options.base_url.trim_end_matches('/').to_string(),
            api_key: options.api_key,
            client,
        }
    }

    /// Submits an intent envelope to the gateway.
    ///
    /// The envelope is validated locally first with the same rule-set the
    /// gateway enforces; on validation failure the result is returned
    /// without any network call. Transport errors and timeouts become
    /// `ok: false` results, never panics or errors.
    ///
    /// # Arguments
    ///
    /// * `envelope` - Intent envelope to submit
    ///
    /// # Returns
    ///
    /// * `IntentResult` - Gateway answer, or a local failure result
    pub async fn send_intent(&self, envelope: &Envelope) -> IntentResult {
        let body = match serde_json::to_value(envelope) {
            Ok(body) => body,
            Err(e) => return IntentResult::failed(format!("invalid envelope: {}", e)),
        };
        if let Err(e) = validate_envelope(&body) {
            return IntentResult::failed(format!("invalid envelope: {}", e));
        }

        let request = self
            .client
            .post(format!("{}/mcp/intent", self.base_url))
            .json(&body);

        match self.authorize(request).send().await {
            Ok(response) => read_result(response).await,
            Err(e) => IntentResult::failed(e.to_string()),
        }
    }

    /// Single-shot read of an intent's status.
    ///
    /// # Arguments
    ///
    /// * `intent_id` - Intent to look up
    ///
    /// # Returns
    ///
    /// * `IntentResult` - Gateway answer, or a transport failure result
    pub async fn get_status(&self, intent_id: &str) -> IntentResult {
        let request = self
            .client
            .get(format!("{}/mcp/status/{}", self.base_url, intent_id));

        match self.authorize(request).send().await {
            Ok(response) => read_result(response).await,
            Err(e) => IntentResult::failed(e.to_string()),
        }
    }

    /// Polls the gateway until the intent reaches a terminal status or the
    /// client-side budget expires.
    ///
    /// Stale non-terminal observations and transient transport failures are
    /// retried within the budget. On expiry the SDK synthesizes a
    /// `REJECTED`/`timeout` result itself, independent of any server-side
    /// timeout.
    ///
    /// # Arguments
    ///
    /// * `intent_id` - Intent to await
    /// * `options` - Polling budgets (defaults: 900 000 ms / 5 000 ms)
    ///
    /// # Returns
    ///
    /// * `IntentResult` - Terminal gateway answer, or the synthesized
    ///   client-side timeout
    pub async fn await_result(&self, intent_id: &str, options: PollOptions) -> IntentResult {
        let start = Instant::now();
        let max_wait = Duration::from_millis(options.max_wait_ms);
        let poll = Duration::from_millis(options.poll_ms.max(1));

        loop {
            if start.elapsed() >= max_wait {
                return IntentResult {
                    ok: false,
                    id: Some(intent_id.to_string()),
                    status: Some(IntentStatus::Rejected),
                    error: Some("timeout".to_string()),
                };
            }

            let result = self.get_status(intent_id).await;
            match (result.ok, result.status) {
                (true, Some(status)) if status.is_terminal() => return result,
                _ => {
                    debug!(
                        "Intent {} not terminal yet (status: {:?}), polling again",
                        intent_id, result.status
                    );
                }
            }

            let remaining = max_wait.saturating_sub(start.elapsed());
            tokio::time::sleep(poll.min(remaining)).await;
        }
    }

    /// Attaches the bearer token when an api key is configured.
    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.api_key {
            Some(api_key) => request.bearer_auth(api_key),
            None => request,
        }
    }
}

/// Folds an HTTP response into an [`IntentResult`].
///
/// Non-2xx responses surface the body's error message when one exists, or
/// a synthetic `http_<status>` marker otherwise.
async fn read_result(response: reqwest::Response) -> IntentResult {
    let status = response.status();
    let body: serde_json::Value = response.json().await.unwrap_or_default();

    if !status.is_success() {
        let error = body
            .get("error")
            .and_then(serde_json::Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| format!("http_{}", status.as_u16()));
        return IntentResult {
            ok: false,
            id: body
                .get("id")
                .and_then(serde_json::Value::as_str)
                .map(str::to_string),
            status: body
                .get("status")
                .and_then(|s| serde_json::from_value(s.clone()).ok()),
            error: Some(error),
        };
    }

    serde_json::from_value(body)
        .unwrap_or_else(|e| IntentResult::failed(format!("invalid response body: {}", e)))
}
