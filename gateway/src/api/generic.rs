//! Generic API structures and server
//!
//! This module contains the response envelope shared by the intent
//! endpoints, the warp filter helpers, the global rejection handler, and
//! the API server itself.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info};
use warp::http::{Method, StatusCode};
use warp::{Filter, Rejection, Reply};

use bridge_adapter::BridgeAdapter;
use relay_types::IntentStatus;

use crate::config::Config;
use crate::metrics;

/// Maximum accepted intent body size in bytes.
const MAX_BODY_BYTES: u64 = 512 * 1024;

// ============================================================================
// SHARED RESPONSE STRUCTURE
// ============================================================================

/// Response body of the intent endpoints: `{ok, id?, status?, error?}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntentResponse {
    /// Whether the request was accepted/answered successfully
    pub ok: bool,
    /// Intent id, echoed when known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Lifecycle status, when a receipt exists
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<IntentStatus>,
    /// Error message (if failed)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl IntentResponse {
    /// Success response carrying the intent id and its status.
    pub fn accepted(id: impl Into<String>, status: IntentStatus) -> Self {
        Self {
            ok: true,
            id: Some(id.into()),
            status: Some(status),
            error: None,
        }
    }

    /// Failure response carrying only an error message.
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            ok: false,
            id: None,
            status: None,
            error: Some(error.into()),
        }
    }

    /// Failure response carrying a receipt's id, status, and error.
    pub fn failed_with_receipt(
        receipt: &relay_types::Receipt,
        fallback_error: &str,
    ) -> Self {
        Self {
            ok: false,
            id: Some(receipt.intent_id.clone()),
            status: Some(receipt.status),
            error: Some(
                receipt
                    .error
                    .clone()
                    .unwrap_or_else(|| fallback_error.to_string()),
            ),
        }
    }
}

// ============================================================================
// WARP FILTER HELPERS
// ============================================================================

/// Creates a warp filter that provides access to the bridge adapter.
pub fn with_adapter(
    adapter: Arc<BridgeAdapter>,
) -> impl Filter<Extract = (Arc<BridgeAdapter>,), Error = std::convert::Infallible> + Clone {
    warp::any().map(move || adapter.clone())
}

/// Creates a warp filter that provides access to the configuration.
pub fn with_config(
    config: Arc<Config>,
) -> impl Filter<Extract = (Arc<Config>,), Error = std::convert::Infallible> + Clone {
    warp::any().map(move || config.clone())
}

// ============================================================================
// CORS CONFIGURATION
// ============================================================================

/// Creates a CORS filter based on the configured allowed origins.
fn create_cors_filter(allowed_origins: &[String]) -> warp::cors::Builder {
    let methods = vec![Method::GET, Method::POST, Method::OPTIONS];

    if allowed_origins.contains(&"*".to_string()) {
        warp::cors()
            .allow_any_origin()
            .allow_methods(methods)
            .allow_headers(vec!["content-type"])
    } else {
        let origins: Vec<&str> = allowed_origins.iter().map(|s| s.as_str()).collect();
        warp::cors()
            .allow_origins(origins)
            .allow_methods(methods)
            .allow_headers(vec!["content-type"])
    }
}

// ============================================================================
// REJECTION HANDLER
// ============================================================================

/// Global rejection handler for all API routes.
///
/// Converts warp rejections (unmatched routes, oversized bodies, wrong
/// methods) into the standard `{ok: false, error}` JSON body. Nothing is
/// allowed to propagate as an unhandled fault to the transport layer.
pub async fn handle_rejection(rej: Rejection) -> Result<impl Reply, std::convert::Infallible> {
    let (status, message) = if rej.is_not_found() {
        (StatusCode::NOT_FOUND, "endpoint not found".to_string())
    } else if rej.find::<warp::reject::PayloadTooLarge>().is_some() {
        (StatusCode::PAYLOAD_TOO_LARGE, "payload too large".to_string())
    } else if rej.find::<warp::reject::MethodNotAllowed>().is_some() {
        (
            StatusCode::METHOD_NOT_ALLOWED,
            "method not allowed".to_string(),
        )
    } else {
        error!("Unhandled rejection: {:?}", rej);
        (StatusCode::INTERNAL_SERVER_ERROR, "internal_error".to_string())
    };

    Ok(warp::reply::with_status(
        warp::reply::json(&IntentResponse::failed(message)),
        status,
    ))
}

// ============================================================================
// API SERVER IMPLEMENTATION
// ============================================================================

/// REST API server for the gateway service.
///
/// Exposes intent intake (`POST /mcp/intent`), out-of-band status polling
/// (`GET /mcp/status/:id`), liveness (`GET /healthz`), and the counter
/// exposition (`GET /metrics`).
pub struct ApiServer {
    /// Service configuration
    config: Arc<Config>,
    /// Bridge adapter for intent dispatch and polling
    adapter: Arc<BridgeAdapter>,
}

impl ApiServer {
    /// Creates a new API server with the given components.
    ///
    /// # Arguments
    ///
    /// * `config` - Service configuration
    /// * `adapter` - Bridge adapter instance
    ///
    /// # Returns
    ///
    /// A new API server instance
    pub fn new(config: Config, adapter: BridgeAdapter) -> Self {
        Self {
            config: Arc::new(config),
            adapter: Arc::new(adapter),
        }
    }

    /// Starts the API server and begins handling HTTP requests.
    ///
    /// # Returns
    ///
    /// * `Ok(())` - Server ran to completion
    /// * `Err(anyhow::Error)` - Failed to parse the bind address
    pub async fn run(&self) -> Result<()> {
        info!(
            "Starting API server on {}:{}",
            self.config.api.host, self.config.api.port
        );

        let routes = self.create_routes();

        let addr: std::net::SocketAddr =
            format!("{}:{}", self.config.api.host, self.config.api.port)
                .parse()
                .context("Failed to parse API server address")?;

        warp::serve(routes).run(addr).await;

        Ok(())
    }

    /// Creates all API routes for the server.
    pub(crate) fn create_routes(
        &self,
    ) -> impl Filter<Extract = impl warp::Reply, Error = std::convert::Infallible> + Clone {
        use super::intent;

        // Liveness probe - always {ok: true}
        let healthz = warp::path("healthz")
            .and(warp::path::end())
            .and(warp::get())
            .map(|| warp::reply::json(&serde_json::json!({ "ok": true })));

        // Plaintext counter exposition
        let metrics_route = warp::path("metrics")
            .and(warp::path::end())
            .and(warp::get())
            .map(|| match metrics::render() {
                Ok(body) => warp::reply::with_status(body, StatusCode::OK).into_response(),
                Err(e) => {
                    error!("Failed to render metrics: {}", e);
                    warp::reply::with_status(String::new(), StatusCode::INTERNAL_SERVER_ERROR)
                        .into_response()
                }
            });

        // Intent intake - the request state machine
        let intent_route = warp::path("mcp")
            .and(warp::path("intent"))
            .and(warp::path::end())
            .and(warp::post())
            .and(warp::body::content_length_limit(MAX_BODY_BYTES))
            .and(warp::body::bytes())
            .and(with_config(self.config.clone()))
            .and(with_adapter(self.adapter.clone()))
            .and_then(intent::post_intent_handler);

        // Out-of-band status polling
        let status_route = warp::path("mcp")
            .and(warp::path("status"))
            .and(warp::path::param::<String>())
            .and(warp::path::end())
            .and(warp::get())
            .and(with_adapter(self.adapter.clone()))
            .and_then(intent::get_status_handler);

        healthz
            .or(metrics_route)
            .or(intent_route)
            .or(status_route)
            .with(create_cors_filter(&self.config.api.cors_origins))
            .recover(handle_rejection)
    }

    /// Public method for testing - exposes routes for integration tests
    #[allow(dead_code)] // Used by tests
    pub fn test_routes(
        &self,
    ) -> impl Filter<Extract = impl warp::Reply, Error = std::convert::Infallible> + Clone {
        self.create_routes()
    }
}
