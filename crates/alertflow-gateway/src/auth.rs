// SPDX-FileCopyrightText: 2026 Alertflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Bearer-token authentication for the `/v1` routes.
//!
//! When no token is configured, every request is rejected (fail-closed).

use axum::{
    Json,
    extract::{Request, State},
    http::{StatusCode, header::AUTHORIZATION},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::handlers::ErrorResponse;

/// Authentication configuration for the gateway.
#[derive(Clone)]
pub struct AuthConfig {
    /// Expected bearer token. `None` disables the API entirely.
    pub bearer_token: Option<String>,
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field(
                "bearer_token",
                &self.bearer_token.as_ref().map(|_| "[redacted]"),
            )
            .finish()
    }
}

impl AuthConfig {
    /// True when `header` is `Bearer <expected token>`.
    fn accepts(&self, header: Option<&str>) -> bool {
        let Some(expected) = self.bearer_token.as_deref().filter(|t| !t.is_empty()) else {
            return false;
        };
        header
            .and_then(|v| v.strip_prefix("Bearer "))
            .is_some_and(|token| token == expected)
    }
}

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(ErrorResponse {
            error: "unauthorized".to_string(),
        }),
    )
        .into_response()
}

/// Middleware that validates the `Authorization: Bearer` header.
pub async fn auth_middleware(
    State(auth): State<AuthConfig>,
    request: Request,
    next: Next,
) -> Response {
    if auth.bearer_token.is_none() {
        tracing::error!("gateway has no bearer token configured -- rejecting request");
        return unauthorized();
    }

    let header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok());

    if auth.accepts(header) {
        next.run(request).await
    } else {
        tracing::debug!(path = %request.uri().path(), "rejected request with bad credentials");
        unauthorized()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(token: Option<&str>) -> AuthConfig {
        AuthConfig {
            bearer_token: token.map(str::to_string),
        }
    }

    #[test]
    fn accepts_matching_bearer_token() {
        let auth = config(Some("secret-token"));
        assert!(auth.accepts(Some("Bearer secret-token")));
        assert!(!auth.accepts(Some("Bearer other")));
        assert!(!auth.accepts(Some("secret-token")));
        assert!(!auth.accepts(None));
    }

    #[test]
    fn no_token_rejects_everything() {
        assert!(!config(None).accepts(Some("Bearer ")));
        assert!(!config(Some("")).accepts(Some("Bearer ")));
    }

    #[test]
    fn debug_redacts_token() {
        let debug_output = format!("{:?}", config(Some("secret-token")));
        assert!(!debug_output.contains("secret-token"));
        assert!(debug_output.contains("[redacted]"));
    }
}
