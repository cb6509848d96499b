// SPDX-FileCopyrightText: 2026 Alertflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP surface for the webhook queue.
//!
//! Exposes ingestion (`POST /v1/webhooks`) and the queue admin operations
//! over axum. Everything under `/v1` sits behind bearer-token auth;
//! `/health` is public.

pub mod auth;
pub mod handlers;
pub mod server;

pub use auth::AuthConfig;
pub use handlers::ErrorResponse;
pub use server::{GatewayState, HealthState, ServerConfig, router, start_server};
