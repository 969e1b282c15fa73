//! Bridge RPC Client Module
//!
//! JSON-RPC implementation of the chain procedure contract, talking to one
//! network's bridge endpoint. Methods mirror the procedure surface:
//! `bridge_initiate`, `bridge_prove`, `bridge_finalize`, `bridge_status`.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use relay_types::ChainNetwork;

use crate::procedures::{ChainProcedures, ProcedureOutcome};

// ============================================================================
// JSON-RPC TYPES
// ============================================================================

#[derive(Debug, Serialize)]
struct JsonRpcRequest {
    jsonrpc: String,
    method: String,
    params: serde_json::Value,
    id: u64,
}

#[derive(Debug, Deserialize)]
struct JsonRpcResponse<T> {
    result: Option<T>,
    error: Option<JsonRpcError>,
}

#[derive(Debug, Deserialize)]
struct JsonRpcError {
    message: String,
}

// ============================================================================
// CLIENT
// ============================================================================

/// Chain procedures backed by one bridge JSON-RPC endpoint.
///
/// The network is fixed at construction and passed as the first positional
/// parameter of every call, so one endpoint can serve several networks.
pub struct RpcBridgeClient {
    client: Client,
    rpc_url: String,
    network: ChainNetwork,
}

impl RpcBridgeClient {
    /// Creates a client for one network's bridge endpoint.
    ///
    /// # Arguments
    ///
    /// * `network` - Network this client initiates and observes for
    /// * `rpc_url` - Bridge RPC endpoint URL
    /// * `timeout_ms` - Per-request timeout in milliseconds
    ///
    /// # Returns
    ///
    /// * `Ok(RpcBridgeClient)` - Ready client
    /// * `Err(anyhow::Error)` - HTTP client could not be constructed
    pub fn new(network: ChainNetwork, rpc_url: &str, timeout_ms: u64) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(timeout_ms))
            .no_proxy() // Avoid macOS system-configuration issues in tests
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            rpc_url: rpc_url.to_string(),
            network,
        })
    }

    /// Performs one JSON-RPC call and unwraps the procedure outcome.
    async fn call(&self, method: &str, params: serde_json::Value) -> Result<ProcedureOutcome> {
        let request = JsonRpcRequest {
            jsonrpc: "2.0".to_string(),
            method: method.to_string(),
            params,
            id: 1,
        };

        debug!("Bridge RPC call {} on {}", method, self.network);

        let response: JsonRpcResponse<ProcedureOutcome> = self
            .client
            .post(&self.rpc_url)
            .json(&request)
            .send()
            .await
            .with_context(|| format!("Failed to call {}", method))?
            .json()
            .await
            .with_context(|| format!("Failed to parse {} response", method))?;

        if let Some(error) = response.error {
            return Err(anyhow::anyhow!("Bridge RPC error: {}", error.message));
        }

        response
            .result
            .ok_or_else(|| anyhow::anyhow!("Bridge RPC returned no result for {}", method))
    }
}

#[async_trait]
impl ChainProcedures for RpcBridgeClient {
    async fn initiate(&self, intent_id: &str, payload_b64: &str) -> Result<ProcedureOutcome> {
        self.call(
            "bridge_initiate",
            serde_json::json!([self.network.as_str(), intent_id, payload_b64]),
        )
        .await
    }

    async fn prove(&self, intent_id: &str) -> Result<ProcedureOutcome> {
        self.call(
            "bridge_prove",
            serde_json::json!([self.network.as_str(), intent_id]),
        )
        .await
    }

    async fn finalize(&self, intent_id: &str) -> Result<ProcedureOutcome> {
        self.call(
            "bridge_finalize",
            serde_json::json!([self.network.as_str(), intent_id]),
        )
        .await
    }

    async fn status(&self, intent_id: &str) -> Result<ProcedureOutcome> {
        self.call(
            "bridge_status",
            serde_json::json!([self.network.as_str(), intent_id]),
        )
        .await
    }
}
