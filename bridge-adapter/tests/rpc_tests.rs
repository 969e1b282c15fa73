//! Unit tests for the bridge RPC client
//!
//! Uses a mock HTTP server to verify the JSON-RPC request shape and the
//! mapping of results and errors into procedure outcomes.

use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use bridge_adapter::{ChainProcedures, RpcBridgeClient};
use relay_types::{ChainNetwork, IntentStatus};

// ============================================================================
// HELPER FUNCTIONS
// ============================================================================

/// Create a client pointed at the mock server
fn build_client(server: &MockServer) -> RpcBridgeClient {
    RpcBridgeClient::new(ChainNetwork::Base, &server.uri(), 1_000).unwrap()
}

// ============================================================================
// REQUEST SHAPE TESTS
// ============================================================================

/// What is tested: initiate posts bridge_initiate with network/id/payload
/// Why: the wire shape is the collaborator contract with the bridge
#[tokio::test]
async fn test_initiate_request_shape() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/"))
        .and(body_partial_json(json!({
            "jsonrpc": "2.0",
            "method": "bridge_initiate",
            "params": ["Base", "t1", "b64:cGF5bG9hZA=="]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "result": { "status": "QUEUED" }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = build_client(&server);
    let outcome = client.initiate("t1", "b64:cGF5bG9hZA==").await.unwrap();
    assert_eq!(outcome.status, IntentStatus::Queued);
    assert!(outcome.tx_id.is_none());
}

/// What is tested: prove parses a result carrying a transaction id
/// Why: txId is optional on the wire and must survive deserialization
#[tokio::test]
async fn test_prove_parses_outcome() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(body_partial_json(json!({ "method": "bridge_prove" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "result": { "status": "PROVEN", "txId": "0xfeed" }
        })))
        .mount(&server)
        .await;

    let client = build_client(&server);
    let outcome = client.prove("t1").await.unwrap();
    assert_eq!(outcome.status, IntentStatus::Proven);
    assert_eq!(outcome.tx_id.as_deref(), Some("0xfeed"));
}

// ============================================================================
// ERROR MAPPING TESTS
// ============================================================================

/// What is tested: a JSON-RPC error object becomes an Err
/// Why: bridge-side errors must be distinguishable from transport success
#[tokio::test]
async fn test_rpc_error_is_mapped() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "error": { "message": "intent not known to bridge" }
        })))
        .mount(&server)
        .await;

    let client = build_client(&server);
    let err = client.status("t1").await.unwrap_err();
    assert!(err.to_string().contains("Bridge RPC error"));
}

/// What is tested: a response with neither result nor error is an Err
/// Why: the client must not fabricate an outcome from an empty reply
#[tokio::test]
async fn test_missing_result_is_mapped() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    let client = build_client(&server);
    let err = client.finalize("t1").await.unwrap_err();
    assert!(err.to_string().contains("no result"));
}

/// What is tested: an unreachable endpoint surfaces as a transport error
/// Why: the adapter converts these into rejection receipts upstream
#[tokio::test]
async fn test_unreachable_endpoint() {
    let client = RpcBridgeClient::new(ChainNetwork::Base, "http://127.0.0.1:9", 200).unwrap();
    assert!(client.status("t1").await.is_err());
}
