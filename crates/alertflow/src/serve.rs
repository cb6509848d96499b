// SPDX-FileCopyrightText: 2026 Alertflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `alertflow serve` command implementation.
//!
//! Opens the SQLite store, wires the remediation backend, then runs the
//! HTTP gateway and the periodic batch worker side by side until SIGINT
//! or SIGTERM.

use std::sync::Arc;
use std::time::Duration;

use alertflow_config::model::AlertflowConfig;
use alertflow_core::{AlertflowError, StorageAdapter};
use alertflow_gateway::{AuthConfig, GatewayState, HealthState, ServerConfig, start_server};
use alertflow_pipeline::{BatchWorker, QueueProcessor, QueueService};
use tracing::{error, info, warn};

use crate::commands::{completion_backend, open_storage};
use crate::shutdown;

/// Runs the `alertflow serve` command.
pub async fn run_serve(config: AlertflowConfig) -> Result<(), AlertflowError> {
    info!(service = %config.service.name, "starting alertflow serve");

    let storage = open_storage(&config).await?;
    let store: Arc<dyn StorageAdapter> = storage.clone();

    let backend = completion_backend(&config)?;
    let processor = Arc::new(QueueProcessor::from_config(store.clone(), backend, &config));
    if config.remediation.ai_enabled && !processor.resolver().generative_enabled() {
        warn!("remediation.ai_enabled is set but no Groq API key is configured; generative tier disabled");
    }

    let cancel = shutdown::install_signal_handler();

    let worker = BatchWorker::new(
        processor.clone(),
        Duration::from_secs(config.processor.interval_secs),
        config.processor.batch_size,
    );
    let worker_handle = tokio::spawn(worker.run(cancel.clone()));

    let state = GatewayState {
        queue: QueueService::new(store),
        processor,
        default_batch_size: config.processor.batch_size,
        auth: AuthConfig {
            bearer_token: config.gateway.bearer_token.clone(),
        },
        health: HealthState {
            start_time: std::time::Instant::now(),
            service_name: config.service.name.clone(),
        },
    };
    let server_config = ServerConfig {
        host: config.gateway.host.clone(),
        port: config.gateway.port,
        bearer_token: config.gateway.bearer_token.clone(),
    };

    let result = start_server(&server_config, state, cancel.clone()).await;

    // The server may have exited on its own (bind failure); stop the worker too.
    cancel.cancel();
    if let Err(e) = worker_handle.await {
        error!(error = %e, "batch worker task panicked");
    }

    if let Err(e) = storage.close().await {
        warn!(error = %e, "failed to close storage cleanly");
    }

    info!("alertflow serve stopped");
    result
}

/// Installs the global tracing subscriber.
///
/// `RUST_LOG` wins when set; otherwise `alertflow*` crates log at
/// `log_level` and everything else at `warn`.
pub fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("alertflow={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .with_writer(std::io::stderr)
        .init();
}
