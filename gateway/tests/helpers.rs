//! Shared test helpers for gateway unit tests
//!
//! Provides configuration builders, mock chain procedures with per-method
//! call counters, and an API server factory wired against the mocks.

use anyhow::Result;
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use bridge_adapter::{BridgeAdapter, ChainProcedures, ProcedureOutcome, ProcedureRegistry};
use gateway::api::ApiServer;
use gateway::config::{AdapterConfig, ApiConfig, ChainEndpointConfig, ChainsConfig, Config};
use relay_types::{Direction, IntentStatus};

// ============================================================================
// CONSTANTS
// ============================================================================

/// Dummy intent id used across gateway tests
#[allow(dead_code)]
pub const DUMMY_INTENT_ID: &str = "t1";

/// Dummy transaction hash reported by the mock finalize step
#[allow(dead_code)]
pub const DUMMY_TX_HASH: &str =
    "0x0000000000000000000000000000000000000000000000000000000000000012";

// ============================================================================
// CONFIGURATION BUILDERS
// ============================================================================

/// Build a valid in-memory test configuration with fast polling budgets.
#[allow(dead_code)]
pub fn build_test_config() -> Config {
    Config {
        api: ApiConfig {
            host: "127.0.0.1".to_string(),
            port: 3999,
            cors_origins: vec![],
        },
        adapter: AdapterConfig {
            max_wait_ms: 2_000,
            poll_ms: 10,
            request_timeout_ms: 1_000,
        },
        chains: ChainsConfig {
            base: ChainEndpointConfig {
                name: "Base".to_string(),
                rpc_url: "http://127.0.0.1:18545".to_string(),
            },
            solana: ChainEndpointConfig {
                name: "Solana".to_string(),
                rpc_url: "http://127.0.0.1:18899".to_string(),
            },
        },
    }
}

/// Build a test configuration with the polling budgets of the slow-bridge
/// scenario (prove never lands within the request budget).
#[allow(dead_code)]
pub fn build_test_config_with_short_budget() -> Config {
    let mut config = build_test_config();
    config.adapter.max_wait_ms = 1_000;
    config.adapter.poll_ms = 500;
    config
}

// ============================================================================
// MOCK CHAIN PROCEDURES
// ============================================================================

/// Scripted behavior of the mock bridge.
#[allow(dead_code)]
#[derive(Debug, Clone, Copy)]
pub enum MockBehavior {
    /// Prove succeeds on the first attempt, finalize completes with a tx id
    Finalize,
    /// Prove keeps reporting "not yet" forever
    NeverProve,
    /// Initiation fails with a transport error
    FailInitiate,
}

/// Mock chain procedures with per-method call counters.
pub struct MockProcedures {
    pub initiate_calls: AtomicUsize,
    pub prove_calls: AtomicUsize,
    pub finalize_calls: AtomicUsize,
    pub status_calls: AtomicUsize,
    behavior: MockBehavior,
}

impl MockProcedures {
    #[allow(dead_code)]
    pub fn new(behavior: MockBehavior) -> Arc<Self> {
        Arc::new(Self {
            initiate_calls: AtomicUsize::new(0),
            prove_calls: AtomicUsize::new(0),
            finalize_calls: AtomicUsize::new(0),
            status_calls: AtomicUsize::new(0),
            behavior,
        })
    }
}

#[async_trait]
impl ChainProcedures for MockProcedures {
    async fn initiate(&self, _intent_id: &str, _payload_b64: &str) -> Result<ProcedureOutcome> {
        self.initiate_calls.fetch_add(1, Ordering::SeqCst);
        if matches!(self.behavior, MockBehavior::FailInitiate) {
            anyhow::bail!("connection refused");
        }
        Ok(ProcedureOutcome {
            status: IntentStatus::Queued,
            tx_id: None,
        })
    }

    async fn prove(&self, _intent_id: &str) -> Result<ProcedureOutcome> {
        self.prove_calls.fetch_add(1, Ordering::SeqCst);
        match self.behavior {
            MockBehavior::Finalize => Ok(ProcedureOutcome {
                status: IntentStatus::Proven,
                tx_id: None,
            }),
            _ => Ok(ProcedureOutcome {
                status: IntentStatus::Sent,
                tx_id: None,
            }),
        }
    }

    async fn finalize(&self, _intent_id: &str) -> Result<ProcedureOutcome> {
        self.finalize_calls.fetch_add(1, Ordering::SeqCst);
        Ok(ProcedureOutcome {
            status: IntentStatus::Finalized,
            tx_id: Some(DUMMY_TX_HASH.to_string()),
        })
    }

    async fn status(&self, _intent_id: &str) -> Result<ProcedureOutcome> {
        self.status_calls.fetch_add(1, Ordering::SeqCst);
        Ok(ProcedureOutcome {
            status: IntentStatus::Queued,
            tx_id: None,
        })
    }
}

// ============================================================================
// SERVER FACTORY
// ============================================================================

/// Create a test API server with the given mock procedures registered for
/// both routing directions.
#[allow(dead_code)]
pub fn create_test_api_server(procedures: Arc<MockProcedures>, config: Config) -> ApiServer {
    let mut registry = ProcedureRegistry::new();
    registry
        .register(Direction::BaseToSolana, procedures.clone())
        .unwrap();
    registry
        .register(Direction::SolanaToBase, procedures)
        .unwrap();

    ApiServer::new(config, BridgeAdapter::new(registry))
}
