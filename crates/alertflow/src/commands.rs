// SPDX-FileCopyrightText: 2026 Alertflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! One-shot CLI commands run against the configured store.
//!
//! Each opens the configured store, does its work, prints JSON to stdout,
//! and closes the store again.

use std::path::Path;
use std::sync::Arc;

use alertflow_config::model::AlertflowConfig;
use alertflow_core::{AlertflowError, CompletionAdapter, StorageAdapter};
use alertflow_groq::GroqProvider;
use alertflow_pipeline::{QueueProcessor, QueueService};
use alertflow_storage::SqliteStorage;
use serde::Serialize;
use serde_json::Value;
use tracing::{info, warn};

/// Opens and migrates the configured SQLite database.
pub async fn open_storage(config: &AlertflowConfig) -> Result<Arc<SqliteStorage>, AlertflowError> {
    let storage = SqliteStorage::new(config.storage.clone());
    storage.initialize().await?;
    Ok(Arc::new(storage))
}

/// The generative backend, when a Groq API key resolves.
pub fn completion_backend(
    config: &AlertflowConfig,
) -> Result<Option<Arc<dyn CompletionAdapter>>, AlertflowError> {
    Ok(GroqProvider::from_config(config)?.map(|p| Arc::new(p) as Arc<dyn CompletionAdapter>))
}

/// Reads a JSON document from `path`.
pub async fn read_payload(path: &Path) -> Result<Value, AlertflowError> {
    let content = tokio::fs::read_to_string(path).await.map_err(|e| {
        AlertflowError::Config(format!("failed to read {}: {e}", path.display()))
    })?;
    serde_json::from_str(&content)
        .map_err(|e| AlertflowError::Config(format!("{} is not valid JSON: {e}", path.display())))
}

fn print_json<T: Serialize>(value: &T) -> Result<(), AlertflowError> {
    let rendered = serde_json::to_string_pretty(value)
        .map_err(|e| AlertflowError::Internal(format!("failed to render output: {e}")))?;
    println!("{rendered}");
    Ok(())
}

async fn close(storage: &SqliteStorage) {
    if let Err(e) = storage.close().await {
        warn!(error = %e, "failed to close storage cleanly");
    }
}

/// `alertflow ingest <file> [--source]`
pub async fn run_ingest(
    config: &AlertflowConfig,
    file: &Path,
    source: Option<&str>,
) -> Result<(), AlertflowError> {
    let payload = read_payload(file).await?;
    let storage = open_storage(config).await?;
    let result = QueueService::new(storage.clone())
        .ingest(payload, source)
        .await;
    close(&storage).await;

    let item = result?;
    print_json(&serde_json::json!({ "id": item.id, "status": item.status }))
}

/// `alertflow process [--limit]`
pub async fn run_process(config: &AlertflowConfig, limit: Option<usize>) -> Result<(), AlertflowError> {
    let storage = open_storage(config).await?;
    let store: Arc<dyn StorageAdapter> = storage.clone();
    let processor = QueueProcessor::from_config(store, completion_backend(config)?, config);

    let summary = processor
        .run_batch(limit.unwrap_or(config.processor.batch_size))
        .await;
    close(&storage).await;

    print_json(&summary)
}

/// `alertflow reprocess <id>`
pub async fn run_reprocess(config: &AlertflowConfig, id: &str) -> Result<(), AlertflowError> {
    let storage = open_storage(config).await?;
    let result = QueueService::new(storage.clone()).reprocess(id).await;
    close(&storage).await;

    print_json(&result?)
}

/// `alertflow clear <ids...>`
pub async fn run_clear(config: &AlertflowConfig, ids: &[String]) -> Result<(), AlertflowError> {
    let storage = open_storage(config).await?;
    let result = QueueService::new(storage.clone()).clear_queue(ids).await;
    close(&storage).await;

    print_json(&serde_json::json!({ "removed": result? }))
}

/// `alertflow stats [--date]`
pub async fn run_stats(config: &AlertflowConfig, date: Option<&str>) -> Result<(), AlertflowError> {
    let storage = open_storage(config).await?;
    let result = QueueService::new(storage.clone()).stats(date).await;
    close(&storage).await;

    print_json(&result?)
}

/// `alertflow check-ai`
pub async fn run_check_ai(config: &AlertflowConfig) -> Result<(), AlertflowError> {
    let provider = GroqProvider::new(&config.groq)?;
    let reply = provider.check_connection().await?;
    info!(model = %config.groq.model, "Groq API connection successful");
    print_json(&serde_json::json!({
        "status": "ok",
        "model": config.groq.model,
        "reply": reply,
    }))
}
