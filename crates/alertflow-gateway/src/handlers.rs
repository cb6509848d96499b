// SPDX-FileCopyrightText: 2026 Alertflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP request handlers for the gateway REST API.

use std::str::FromStr;

use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use alertflow_core::types::DATE_FORMAT;
use alertflow_core::{Alert, AlertflowError, BatchSummary, QueueFilter, QueueItem, QueueStats, QueueStatus};

use crate::server::GatewayState;

/// Largest `limit` accepted by list endpoints.
pub const MAX_LIST_LIMIT: usize = 500;

/// Largest batch one `POST /v1/process` request may run.
pub const MAX_BATCH_LIMIT: usize = 500;

/// Error response body.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error description.
    pub error: String,
}

/// Handler error carrying its HTTP status.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }
}

impl From<AlertflowError> for ApiError {
    fn from(err: AlertflowError) -> Self {
        let status = match &err {
            AlertflowError::NotFound { .. } => StatusCode::NOT_FOUND,
            AlertflowError::InvalidTransition { .. } => StatusCode::CONFLICT,
            AlertflowError::Timeout { .. } => StatusCode::GATEWAY_TIMEOUT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            tracing::error!(error = %err, "request failed");
        }
        Self {
            status,
            message: err.to_string(),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ErrorResponse {
                error: self.message,
            }),
        )
            .into_response()
    }
}

type ApiResult<T> = Result<T, ApiError>;

/// Response body for GET /health.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
    pub uptime_secs: u64,
}

#[derive(Debug, Deserialize)]
pub struct IngestParams {
    #[serde(default)]
    pub source: Option<String>,
}

/// Response body for POST /v1/webhooks.
#[derive(Debug, Serialize, Deserialize)]
pub struct IngestResponse {
    pub id: String,
    pub status: QueueStatus,
}

#[derive(Debug, Default, Deserialize)]
pub struct QueueParams {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub limit: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
pub struct DateParams {
    #[serde(default)]
    pub date: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct LimitParams {
    #[serde(default)]
    pub limit: Option<usize>,
}

/// Request body for POST /v1/queue/clear.
#[derive(Debug, Deserialize)]
pub struct ClearRequest {
    pub ids: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ClearResponse {
    pub removed: usize,
}

#[derive(Debug, Serialize)]
pub struct QueueListResponse {
    pub items: Vec<QueueItem>,
    pub count: usize,
}

#[derive(Debug, Serialize)]
pub struct AlertListResponse {
    pub alerts: Vec<Alert>,
    pub count: usize,
}

fn list_limit(requested: Option<usize>) -> usize {
    requested
        .unwrap_or(QueueFilter::default().limit)
        .min(MAX_LIST_LIMIT)
}

fn batch_limit(requested: Option<usize>, default: usize) -> usize {
    requested.unwrap_or(default).min(MAX_BATCH_LIMIT)
}

/// Rejects anything that is not a real `YYYY-MM-DD` date.
fn parse_date(raw: Option<String>) -> ApiResult<Option<String>> {
    match raw.filter(|d| !d.is_empty()) {
        None => Ok(None),
        Some(date) => chrono::NaiveDate::parse_from_str(&date, DATE_FORMAT)
            .map(|_| Some(date.clone()))
            .map_err(|_| ApiError::bad_request(format!("invalid date '{date}', expected YYYY-MM-DD"))),
    }
}

fn parse_status(raw: Option<String>) -> ApiResult<Option<QueueStatus>> {
    match raw.filter(|s| !s.is_empty()) {
        None => Ok(None),
        Some(status) => QueueStatus::from_str(&status).map(Some).map_err(|_| {
            ApiError::bad_request(format!(
                "invalid status '{status}', expected pending, processed, discarded, or error"
            ))
        }),
    }
}

/// GET /health
pub async fn get_health(State(state): State<GatewayState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        service: state.health.service_name.clone(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.health.start_time.elapsed().as_secs(),
    })
}

/// POST /v1/webhooks
///
/// Queues one JSON document as a `pending` item and returns its id.
pub async fn post_webhook(
    State(state): State<GatewayState>,
    params: Result<Query<IngestParams>, QueryRejection>,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<IngestResponse>)> {
    let Query(params) = params?;
    let Json(payload) = body?;
    let item = state.queue.ingest(payload, params.source.as_deref()).await?;
    Ok((
        StatusCode::ACCEPTED,
        Json(IngestResponse {
            id: item.id,
            status: item.status,
        }),
    ))
}

/// GET /v1/queue
pub async fn list_queue(
    State(state): State<GatewayState>,
    params: Result<Query<QueueParams>, QueryRejection>,
) -> ApiResult<Json<QueueListResponse>> {
    let Query(params) = params?;
    let filter = QueueFilter {
        status: parse_status(params.status)?,
        date: parse_date(params.date)?,
        limit: list_limit(params.limit),
        oldest_first: false,
    };
    let items = state.queue.list_items(&filter).await?;
    Ok(Json(QueueListResponse {
        count: items.len(),
        items,
    }))
}

/// GET /v1/queue/stats
pub async fn queue_stats(
    State(state): State<GatewayState>,
    params: Result<Query<DateParams>, QueryRejection>,
) -> ApiResult<Json<QueueStats>> {
    let Query(params) = params?;
    let date = parse_date(params.date)?;
    Ok(Json(state.queue.stats(date.as_deref()).await?))
}

/// GET /v1/queue/{id}
pub async fn get_queue_item(
    State(state): State<GatewayState>,
    Path(id): Path<String>,
) -> ApiResult<Json<QueueItem>> {
    Ok(Json(state.queue.get_item(&id).await?))
}

/// POST /v1/queue/{id}/reprocess
pub async fn reprocess_item(
    State(state): State<GatewayState>,
    Path(id): Path<String>,
) -> ApiResult<Json<QueueItem>> {
    Ok(Json(state.queue.reprocess(&id).await?))
}

/// POST /v1/queue/clear
///
/// Deletes the listed items whatever their status. Unknown ids are ignored.
pub async fn clear_queue(
    State(state): State<GatewayState>,
    body: Result<Json<ClearRequest>, JsonRejection>,
) -> ApiResult<Json<ClearResponse>> {
    let Json(request) = body?;
    let removed = state.queue.clear_queue(&request.ids).await?;
    Ok(Json(ClearResponse { removed }))
}

/// POST /v1/process
///
/// Runs one batch synchronously. Always answers with a summary.
pub async fn run_batch(
    State(state): State<GatewayState>,
    params: Result<Query<LimitParams>, QueryRejection>,
) -> ApiResult<Json<BatchSummary>> {
    let Query(params) = params?;
    let limit = batch_limit(params.limit, state.default_batch_size);
    Ok(Json(state.processor.run_batch(limit).await))
}

/// GET /v1/alerts
pub async fn list_alerts(
    State(state): State<GatewayState>,
    params: Result<Query<LimitParams>, QueryRejection>,
) -> ApiResult<Json<AlertListResponse>> {
    let Query(params) = params?;
    let alerts = state.queue.list_alerts(list_limit(params.limit)).await?;
    Ok(Json(AlertListResponse {
        count: alerts.len(),
        alerts,
    }))
}

/// GET /v1/alerts/{id}
pub async fn get_alert(
    State(state): State<GatewayState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Alert>> {
    Ok(Json(state.queue.get_alert(&id).await?))
}
