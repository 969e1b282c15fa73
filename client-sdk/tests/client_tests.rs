//! Unit tests for the relay client SDK
//!
//! Uses a mock gateway to verify local pre-flight validation, response
//! mapping, bearer authorization, and the await_result polling contract.

use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use client_sdk::{
    ChainNetwork, ChainRoute, Envelope, IntentResult, IntentStatus, PollOptions, RelayClient,
    RelayClientOptions,
};

// ============================================================================
// HELPER FUNCTIONS
// ============================================================================

/// Create a client pointed at the mock gateway
fn build_client(server: &MockServer) -> RelayClient {
    RelayClient::new(RelayClientOptions {
        base_url: server.uri(),
        api_key: None,
        timeout_ms: Some(1_000),
    })
}

/// Create a well-formed envelope for the Base→Solana route
fn valid_envelope() -> Envelope {
    Envelope {
        kind: "request".to_string(),
        id: "t1".to_string(),
        method: "call_tool".to_string(),
        params: serde_json::Map::from_iter([(
            "name".to_string(),
            serde_json::Value::String("swap".to_string()),
        )]),
        chain: ChainRoute {
            origin: ChainNetwork::Base,
            destination: ChainNetwork::Solana,
            executor: "0xabc".to_string(),
            signature: "0xsig".to_string(),
            deadline: None,
            nonce: None,
        },
    }
}

/// Budgets small enough for fast timeout tests
const FAST_POLL: PollOptions = PollOptions {
    max_wait_ms: 300,
    poll_ms: 100,
};

// ============================================================================
// SEND INTENT TESTS
// ============================================================================

/// What is tested: a locally invalid envelope makes no network call
/// Why: the pre-flight check shares the gateway's rule-set and gates the wire
#[tokio::test]
async fn test_send_intent_local_validation_short_circuits() {
    let server = MockServer::start().await;

    // Any request reaching the server fails the expectation
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(202))
        .expect(0)
        .mount(&server)
        .await;

    let client = build_client(&server);
    let mut envelope = valid_envelope();
    envelope.chain.signature = String::new();

    let result = client.send_intent(&envelope).await;
    assert!(!result.ok);
    assert!(result.error.unwrap().contains("invalid envelope"));
}

/// What is tested: a 202 answer maps onto an ok result with id and status
/// Why: the gateway response body is the SDK's success contract
#[tokio::test]
async fn test_send_intent_success() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/mcp/intent"))
        .and(body_partial_json(json!({ "id": "t1", "type": "request" })))
        .respond_with(ResponseTemplate::new(202).set_body_json(json!({
            "ok": true, "id": "t1", "status": "FINALIZED"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = build_client(&server);
    let result = client.send_intent(&valid_envelope()).await;

    assert_eq!(
        result,
        IntentResult {
            ok: true,
            id: Some("t1".to_string()),
            status: Some(IntentStatus::Finalized),
            error: None,
        }
    );
}

/// What is tested: a 400 answer surfaces the body's error message
/// Why: gateway-side validation failures must be readable by the caller
#[tokio::test]
async fn test_send_intent_gateway_error_body() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "ok": false, "error": "chain fields missing: chain.executor is required"
        })))
        .mount(&server)
        .await;

    let client = build_client(&server);
    let result = client.send_intent(&valid_envelope()).await;

    assert!(!result.ok);
    assert!(result.error.unwrap().contains("chain.executor"));
}

/// What is tested: a non-JSON error answer falls back to http_<status>
/// Why: the SDK must produce a diagnostic even for bodyless failures
#[tokio::test]
async fn test_send_intent_http_status_fallback() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let client = build_client(&server);
    let result = client.send_intent(&valid_envelope()).await;

    assert!(!result.ok);
    assert_eq!(result.error.as_deref(), Some("http_503"));
}

/// What is tested: an unreachable gateway becomes an ok:false result
/// Why: the SDK never raises for transport failures
#[tokio::test]
async fn test_send_intent_transport_error() {
    let client = RelayClient::new(RelayClientOptions {
        base_url: "http://127.0.0.1:9".to_string(),
        api_key: None,
        timeout_ms: Some(200),
    });

    let result = client.send_intent(&valid_envelope()).await;
    assert!(!result.ok);
    assert!(result.error.is_some());
}

/// What is tested: the configured api key rides as a bearer token
/// Why: authenticated deployments attach authorization on every request
#[tokio::test]
async fn test_send_intent_bearer_auth() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(header("authorization", "Bearer secret-key"))
        .respond_with(ResponseTemplate::new(202).set_body_json(json!({
            "ok": true, "id": "t1", "status": "QUEUED"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = RelayClient::new(RelayClientOptions {
        base_url: server.uri(),
        api_key: Some("secret-key".to_string()),
        timeout_ms: Some(1_000),
    });

    let result = client.send_intent(&valid_envelope()).await;
    assert!(result.ok);
}

// ============================================================================
// STATUS AND AWAIT RESULT TESTS
// ============================================================================

/// What is tested: get_status maps a 200 answer onto an ok result
/// Why: single-shot polling is the building block of await_result
#[tokio::test]
async fn test_get_status() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/mcp/status/t1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "ok": true, "id": "t1", "status": "SENT"
        })))
        .mount(&server)
        .await;

    let client = build_client(&server);
    let result = client.get_status("t1").await;

    assert!(result.ok);
    assert_eq!(result.status, Some(IntentStatus::Sent));
}

/// What is tested: a 404 maps onto ok:false with the body's error
/// Why: unknown ids are a client-visible failure, not a panic
#[tokio::test]
async fn test_get_status_not_found() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "ok": false, "error": "not_found"
        })))
        .mount(&server)
        .await;

    let client = build_client(&server);
    let result = client.get_status("0xmissing").await;

    assert!(!result.ok);
    assert_eq!(result.error.as_deref(), Some("not_found"));
}

/// What is tested: await_result returns as soon as a terminal status shows
/// Why: stale non-terminal reads poll again; terminal ones stop the loop
#[tokio::test]
async fn test_await_result_reaches_terminal() {
    let server = MockServer::start().await;

    // First poll observes a stale QUEUED, the next one the terminal state
    Mock::given(method("GET"))
        .and(path("/mcp/status/t1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "ok": true, "id": "t1", "status": "QUEUED"
        })))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/mcp/status/t1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "ok": true, "id": "t1", "status": "FINALIZED"
        })))
        .mount(&server)
        .await;

    let client = build_client(&server);
    let result = client
        .await_result(
            "t1",
            PollOptions {
                max_wait_ms: 5_000,
                poll_ms: 50,
            },
        )
        .await;

    assert!(result.ok);
    assert_eq!(result.status, Some(IntentStatus::Finalized));
}

/// What is tested: a terminal REJECTED stops the loop like a success does
/// Why: REJECTED is terminal; polling past it would never converge
#[tokio::test]
async fn test_await_result_stops_on_rejection() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "ok": true, "id": "t1", "status": "REJECTED"
        })))
        .mount(&server)
        .await;

    let client = build_client(&server);
    let result = client.await_result("t1", FAST_POLL).await;

    assert!(result.ok);
    assert_eq!(result.status, Some(IntentStatus::Rejected));
}

/// What is tested: budget expiry synthesizes a client-side REJECTED/timeout
/// Why: the client-side deadline is independent of any server-side timeout
#[tokio::test]
async fn test_await_result_client_side_timeout() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "ok": true, "id": "t1", "status": "QUEUED"
        })))
        .mount(&server)
        .await;

    let client = build_client(&server);
    let result = client.await_result("t1", FAST_POLL).await;

    assert_eq!(
        result,
        IntentResult {
            ok: false,
            id: Some("t1".to_string()),
            status: Some(IntentStatus::Rejected),
            error: Some("timeout".to_string()),
        }
    );
}

/// What is tested: transport failures during polling retry until budget
/// Why: transient gateway unavailability must not abort the wait early
#[tokio::test]
async fn test_await_result_survives_transport_errors() {
    let client = RelayClient::new(RelayClientOptions {
        base_url: "http://127.0.0.1:9".to_string(),
        api_key: None,
        timeout_ms: Some(100),
    });

    let result = client.await_result("t1", FAST_POLL).await;

    assert!(!result.ok);
    assert_eq!(result.error.as_deref(), Some("timeout"));
}
