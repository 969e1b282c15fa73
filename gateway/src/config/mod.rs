//! Configuration Management Module
//!
//! This module handles loading and managing configuration for the gateway
//! service: API bind settings, adapter polling budgets, and the bridge RPC
//! endpoints for each chain.

use serde::{Deserialize, Serialize};

// ============================================================================
// CONFIGURATION STRUCTURES
// ============================================================================

/// Main configuration structure containing all service settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// API server configuration (host, port, CORS settings)
    pub api: ApiConfig,
    /// Adapter timing budgets
    #[serde(default)]
    pub adapter: AdapterConfig,
    /// Bridge RPC endpoints per chain
    pub chains: ChainsConfig,
}

/// API server configuration for external communication.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Host address to bind the API server to
    pub host: String,
    /// Port number to bind the API server to
    pub port: u16,
    /// Allowed CORS origins for cross-origin requests
    pub cors_origins: Vec<String>,
}

/// Timing budgets handed to the bridge adapter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdapterConfig {
    /// Overall finality polling budget in milliseconds
    pub max_wait_ms: u64,
    /// Interval between prove/finalize attempts in milliseconds
    pub poll_ms: u64,
    /// Per-request timeout for bridge RPC calls in milliseconds
    pub request_timeout_ms: u64,
}

impl Default for AdapterConfig {
    fn default() -> Self {
        Self {
            max_wait_ms: 900_000,
            poll_ms: 5_000,
            request_timeout_ms: 30_000,
        }
    }
}

/// Bridge RPC endpoints, one per routed chain.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChainsConfig {
    /// Base network bridge endpoint
    pub base: ChainEndpointConfig,
    /// Solana network bridge endpoint
    pub solana: ChainEndpointConfig,
}

/// Configuration for one chain's bridge endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChainEndpointConfig {
    /// Human-readable name for the chain
    pub name: String,
    /// Bridge RPC endpoint URL
    pub rpc_url: String,
}

// ============================================================================
// CONFIGURATION LOADING AND MANAGEMENT
// ============================================================================

impl Config {
    /// Validates the configuration.
    ///
    /// # Returns
    ///
    /// - `Ok(())` - Configuration is valid
    /// - `Err(anyhow::Error)` - Invalid timing budget or missing endpoint
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.adapter.poll_ms == 0 {
            return Err(anyhow::anyhow!(
                "Configuration error: adapter.poll_ms must be greater than zero"
            ));
        }
        if self.adapter.request_timeout_ms == 0 {
            return Err(anyhow::anyhow!(
                "Configuration error: adapter.request_timeout_ms must be greater than zero"
            ));
        }
        for (name, endpoint) in [("base", &self.chains.base), ("solana", &self.chains.solana)] {
            if endpoint.rpc_url.is_empty() {
                return Err(anyhow::anyhow!(
                    "Configuration error: chains.{}.rpc_url must not be empty",
                    name
                ));
            }
        }
        Ok(())
    }

    /// Loads configuration from the TOML file.
    ///
    /// This function:
    /// 1. Checks if config/gateway.toml (or `GATEWAY_CONFIG_PATH`) exists
    /// 2. If it exists, loads, parses, and validates the configuration
    /// 3. If it doesn't exist, returns an error asking user to copy template
    ///
    /// # Returns
    ///
    /// - `Ok(Config)` - Successfully loaded and validated configuration
    /// - `Err(anyhow::Error)` - File missing, unparsable, or invalid
    pub fn load() -> anyhow::Result<Self> {
        // Check for custom config path via environment variable (for tests)
        let config_path = std::env::var("GATEWAY_CONFIG_PATH")
            .unwrap_or_else(|_| "config/gateway.toml".to_string());

        if std::path::Path::new(&config_path).exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = toml::from_str(&content)?;
            config.validate()?;
            Ok(config)
        } else {
            Err(anyhow::anyhow!(
                "Configuration file '{}' not found. Please copy the template:\n\
                cp config/gateway.template.toml config/gateway.toml\n\
                Then edit config/gateway.toml with your actual values.",
                config_path
            ))
        }
    }

    /// Creates a default configuration with placeholder values.
    ///
    /// Suitable for local development and testing; production deployments
    /// must replace the placeholder bridge endpoints.
    pub fn default() -> Self {
        Self {
            api: ApiConfig {
                host: "127.0.0.1".to_string(),
                port: 8080,
                cors_origins: vec!["http://localhost:8080".to_string()],
            },
            adapter: AdapterConfig::default(),
            chains: ChainsConfig {
                base: ChainEndpointConfig {
                    name: "Base".to_string(),
                    rpc_url: "http://127.0.0.1:8545".to_string(),
                },
                solana: ChainEndpointConfig {
                    name: "Solana".to_string(),
                    rpc_url: "http://127.0.0.1:8899".to_string(),
                },
            },
        }
    }
}
