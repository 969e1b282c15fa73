//! Unit tests for gateway configuration loading and validation

#[path = "mod.rs"]
mod test_helpers;
use test_helpers::build_test_config;

use gateway::config::Config;

// ============================================================================
// VALIDATION TESTS
// ============================================================================

/// What is tested: the in-memory test configuration validates
/// Why: every other test builds on this configuration being well-formed
#[test]
fn test_test_config_is_valid() {
    build_test_config().validate().unwrap();
}

/// What is tested: the placeholder default configuration validates
/// Why: local development should start from a working baseline
#[test]
fn test_default_config_is_valid() {
    Config::default().validate().unwrap();
}

/// What is tested: a zero poll interval is refused
/// Why: poll_ms = 0 would turn the finality loop into a busy-loop
#[test]
fn test_zero_poll_interval_rejected() {
    let mut config = build_test_config();
    config.adapter.poll_ms = 0;

    let err = config.validate().unwrap_err();
    assert!(err.to_string().contains("poll_ms"));
}

/// What is tested: an empty bridge endpoint is refused
/// Why: a direction without an endpoint could never initiate
#[test]
fn test_empty_rpc_url_rejected() {
    let mut config = build_test_config();
    config.chains.solana.rpc_url = String::new();

    let err = config.validate().unwrap_err();
    assert!(err.to_string().contains("solana"));
}

// ============================================================================
// TEMPLATE AND FILE LOADING TESTS
// ============================================================================

/// What is tested: the checked-in template parses and validates
/// Why: the template is the documented starting point for deployments
#[test]
fn test_template_parses() {
    let content = include_str!("../config/gateway.template.toml");
    let config: Config = toml::from_str(content).unwrap();
    config.validate().unwrap();

    assert_eq!(config.adapter.max_wait_ms, 900_000);
    assert_eq!(config.adapter.poll_ms, 5_000);
}

/// What is tested: adapter budgets fall back to defaults when omitted
/// Why: the [adapter] section is optional in deployment configs
#[test]
fn test_adapter_defaults_applied() {
    let content = r#"
        [api]
        host = "127.0.0.1"
        port = 8080
        cors_origins = []

        [chains.base]
        name = "Base"
        rpc_url = "http://127.0.0.1:8545"

        [chains.solana]
        name = "Solana"
        rpc_url = "http://127.0.0.1:8899"
    "#;

    let config: Config = toml::from_str(content).unwrap();
    config.validate().unwrap();
    assert_eq!(config.adapter.max_wait_ms, 900_000);
    assert_eq!(config.adapter.poll_ms, 5_000);
    assert_eq!(config.adapter.request_timeout_ms, 30_000);
}

/// What is tested: Config::load honors GATEWAY_CONFIG_PATH and reports a
/// template-copy hint for missing files
/// Why: deployments point the service at their config through this variable
///
/// Both cases live in one test because they mutate shared process state
/// (the environment variable).
#[test]
fn test_load_from_env_path() {
    let dir = std::env::temp_dir();
    let path = dir.join("gateway_config_test.toml");
    let content = toml::to_string(&build_test_config()).unwrap();
    std::fs::write(&path, content).unwrap();

    std::env::set_var("GATEWAY_CONFIG_PATH", &path);
    let config = Config::load().unwrap();
    assert_eq!(config.api.port, 3999);

    std::env::set_var("GATEWAY_CONFIG_PATH", dir.join("gateway_config_missing.toml"));
    let err = Config::load().unwrap_err();
    assert!(err.to_string().contains("template"));

    std::env::remove_var("GATEWAY_CONFIG_PATH");
    let _ = std::fs::remove_file(&path);
}
