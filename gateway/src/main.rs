//! Gateway Service
//!
//! HTTP-facing orchestrator for cross-chain intent envelopes. The gateway
//! validates incoming envelopes, routes them through the bridge adapter by
//! direction, and for directions requiring multi-step finality blocks on the
//! prove/finalize polling loop before responding.
//!
//! The gateway holds no keys and signs nothing: envelope signatures are
//! opaque tokens threaded through to the chain-side bridge procedures.

use anyhow::Result;
use std::sync::Arc;
use tracing::{debug, info};

use bridge_adapter::{BridgeAdapter, ProcedureRegistry, RpcBridgeClient};
use gateway::api::ApiServer;
use gateway::config::Config;
use relay_types::{ChainNetwork, Direction, RelayObserver};

/// Observer forwarding bridge lifecycle events into the tracing log.
struct TracingObserver;

impl RelayObserver for TracingObserver {
    fn on_event(&self, name: &str, payload: &serde_json::Value) {
        debug!("Bridge event {}: {}", name, payload);
    }
}

// ============================================================================
// MAIN APPLICATION ENTRY POINT
// ============================================================================

/// Main application entry point that initializes and runs the gateway.
///
/// This function:
/// 1. Initializes logging and tracing
/// 2. Loads configuration from TOML file
/// 3. Builds the chain procedure registry and bridge adapter
/// 4. Starts the API server and runs until shutdown
#[tokio::main]
async fn main() -> Result<()> {
    // Initialize structured logging for debugging and monitoring
    tracing_subscriber::fmt::init();

    info!("Starting Gateway Service");

    // Parse command line arguments
    let args: Vec<String> = std::env::args().collect();

    // Check for help flag
    if args.iter().any(|arg| arg == "--help" || arg == "-h") {
        println!("Gateway Service");
        println!();
        println!("Usage: gateway [OPTIONS]");
        println!();
        println!("Options:");
        println!("  --config <path>   Use custom config file path");
        println!("  --help, -h        Show this help message");
        println!();
        println!("Environment variables:");
        println!("  GATEWAY_CONFIG_PATH    Path to config file (overrides --config)");
        return Ok(());
    }

    // Check for custom config path
    let mut config_path = None;
    for (i, arg) in args.iter().enumerate() {
        if arg == "--config" && i + 1 < args.len() {
            config_path = Some(args[i + 1].clone());
            break;
        }
    }
    if let Some(path) = config_path {
        std::env::set_var("GATEWAY_CONFIG_PATH", &path);
        info!("Using custom config: {}", path);
    }

    // Load configuration from config file (or GATEWAY_CONFIG_PATH env var)
    let config = Config::load()?;
    info!("Configuration loaded successfully");

    // Register one bridge RPC client per routing direction; each direction
    // is driven by its origin chain's bridge endpoint.
    let mut registry = ProcedureRegistry::new();
    registry.register(
        Direction::BaseToSolana,
        Arc::new(RpcBridgeClient::new(
            ChainNetwork::Base,
            &config.chains.base.rpc_url,
            config.adapter.request_timeout_ms,
        )?),
    )?;
    registry.register(
        Direction::SolanaToBase,
        Arc::new(RpcBridgeClient::new(
            ChainNetwork::Solana,
            &config.chains.solana.rpc_url,
            config.adapter.request_timeout_ms,
        )?),
    )?;

    let adapter = BridgeAdapter::new(registry).with_observer(Arc::new(TracingObserver));
    info!("Bridge adapter initialized successfully");

    // Run the service (this blocks until shutdown)
    let api_server = ApiServer::new(config, adapter);
    api_server.run().await?;

    Ok(())
}
