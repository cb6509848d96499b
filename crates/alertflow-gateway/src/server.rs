// SPDX-FileCopyrightText: 2026 Alertflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gateway HTTP server built on axum.
//!
//! Sets up routes, middleware, and shared state for the gateway.

use std::sync::Arc;

use axum::{
    Router, middleware as axum_middleware,
    routing::{get, post},
};
use tokio_util::sync::CancellationToken;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use alertflow_core::AlertflowError;
use alertflow_pipeline::{QueueProcessor, QueueService};

use crate::auth::{AuthConfig, auth_middleware};
use crate::handlers;

/// State for the unauthenticated health endpoint.
#[derive(Clone)]
pub struct HealthState {
    /// Process start time for uptime calculation.
    pub start_time: std::time::Instant,
    pub service_name: String,
}

/// Shared state for axum request handlers.
#[derive(Clone)]
pub struct GatewayState {
    pub queue: QueueService,
    pub processor: Arc<QueueProcessor>,
    /// Batch size for `POST /v1/process` without a `limit`.
    pub default_batch_size: usize,
    pub auth: AuthConfig,
    pub health: HealthState,
}

/// Gateway server configuration (mirrors `GatewayConfig` from alertflow-config).
#[derive(Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Bearer token for auth (`None` = every `/v1` request is rejected).
    pub bearer_token: Option<String>,
}

impl std::fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field(
                "bearer_token",
                &self.bearer_token.as_ref().map(|_| "[redacted]"),
            )
            .finish()
    }
}

/// Builds the application router.
///
/// - GET /health (public)
/// - POST /v1/webhooks
/// - GET /v1/queue, GET /v1/queue/stats, GET /v1/queue/{id}
/// - POST /v1/queue/clear
/// - POST /v1/queue/{id}/reprocess
/// - POST /v1/process
/// - GET /v1/alerts, GET /v1/alerts/{id}
pub fn router(state: GatewayState) -> Router {
    let auth_state = state.auth.clone();

    let public_routes = Router::new()
        .route("/health", get(handlers::get_health))
        .with_state(state.clone());

    let api_routes = Router::new()
        .route("/v1/webhooks", post(handlers::post_webhook))
        .route("/v1/queue", get(handlers::list_queue))
        .route("/v1/queue/stats", get(handlers::queue_stats))
        .route("/v1/queue/clear", post(handlers::clear_queue))
        .route("/v1/queue/{id}", get(handlers::get_queue_item))
        .route("/v1/queue/{id}/reprocess", post(handlers::reprocess_item))
        .route("/v1/process", post(handlers::run_batch))
        .route("/v1/alerts", get(handlers::list_alerts))
        .route("/v1/alerts/{id}", get(handlers::get_alert))
        .route_layer(axum_middleware::from_fn_with_state(
            auth_state,
            auth_middleware,
        ))
        .with_state(state);

    Router::new()
        .merge(public_routes)
        .merge(api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// Binds `host:port` and serves until `cancel` fires.
pub async fn start_server(
    config: &ServerConfig,
    state: GatewayState,
    cancel: CancellationToken,
) -> Result<(), AlertflowError> {
    if config.bearer_token.is_none() {
        tracing::warn!("no gateway bearer token configured; /v1 routes will reject every request");
    }

    let app = router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AlertflowError::Internal(format!("failed to bind gateway to {addr}: {e}")))?;

    tracing::info!("Gateway server listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(cancel.cancelled_owned())
        .await
        .map_err(|e| AlertflowError::Internal(format!("gateway server error: {e}")))?;

    tracing::info!("Gateway server stopped");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_config_debug_redacts_token() {
        let config = ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 3000,
            bearer_token: Some("hunter2".into()),
        };
        let debug = format!("{config:?}");
        assert!(debug.contains("127.0.0.1"));
        assert!(!debug.contains("hunter2"));
    }
}
