// SPDX-FileCopyrightText: 2026 Alertflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-process tests of the gateway router.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use axum::response::Response;
use serde_json::{Value, json};
use tower::ServiceExt;

use alertflow_classifier::ExtractDefaults;
use alertflow_gateway::{AuthConfig, GatewayState, HealthState, router};
use alertflow_pipeline::{QueueProcessor, QueueService};
use alertflow_remediation::Resolver;
use alertflow_test_utils::MemoryStorage;

const TOKEN: &str = "test-token";

struct TestApp {
    app: Router,
    store: Arc<MemoryStorage>,
}

impl TestApp {
    fn new(bearer_token: Option<&str>) -> Self {
        let store = Arc::new(MemoryStorage::new());
        let processor = QueueProcessor::new(
            store.clone(),
            Resolver::without_backend(store.clone()),
            ExtractDefaults::default(),
        );
        let state = GatewayState {
            queue: QueueService::new(store.clone()),
            processor: Arc::new(processor),
            default_batch_size: 10,
            auth: AuthConfig {
                bearer_token: bearer_token.map(str::to_string),
            },
            health: HealthState {
                start_time: std::time::Instant::now(),
                service_name: "alertflow-test".into(),
            },
        };
        Self {
            app: router(state),
            store,
        }
    }

    async fn send(&self, method: Method, uri: &str, body: Option<Value>) -> Response {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::AUTHORIZATION, format!("Bearer {TOKEN}"));
        let body = match body {
            Some(v) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(serde_json::to_vec(&v).unwrap())
            }
            None => Body::empty(),
        };
        self.app
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .expect("axum to always respond")
    }

    async fn get(&self, uri: &str) -> Response {
        self.send(Method::GET, uri, None).await
    }

    async fn post(&self, uri: &str, body: Option<Value>) -> Response {
        self.send(Method::POST, uri, body).await
    }
}

async fn body_json(resp: Response) -> Value {
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn ec2_critical() -> Value {
    json!({
        "Type": "Notification",
        "Subject": "AWS EC2 CRITICAL CPU Alert",
        "Message": "i-0123456789abcdef0 in us-east-1, account 111122223333"
    })
}

#[tokio::test]
async fn health_is_public() {
    let app = TestApp::new(None);
    let resp = app
        .app
        .clone()
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let json = body_json(resp).await;
    assert_eq!(json["status"], "ok");
    assert_eq!(json["service"], "alertflow-test");
}

#[tokio::test]
async fn api_is_fail_closed_without_configured_token() {
    let app = TestApp::new(None);
    let resp = app.get("/v1/queue").await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(resp).await["error"], "unauthorized");
}

#[tokio::test]
async fn wrong_or_missing_token_is_rejected() {
    let app = TestApp::new(Some("a-different-token"));
    assert_eq!(
        app.get("/v1/queue").await.status(),
        StatusCode::UNAUTHORIZED
    );

    let app = TestApp::new(Some(TOKEN));
    let resp = app
        .app
        .clone()
        .oneshot(Request::get("/v1/queue").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn ingest_then_process_then_lookup() {
    let app = TestApp::new(Some(TOKEN));

    let resp = app
        .post("/v1/webhooks?source=sns", Some(ec2_critical()))
        .await;
    assert_eq!(resp.status(), StatusCode::ACCEPTED);
    let ingested = body_json(resp).await;
    assert_eq!(ingested["status"], "pending");
    let id = ingested["id"].as_str().unwrap().to_string();

    let item = body_json(app.get(&format!("/v1/queue/{id}")).await).await;
    assert_eq!(item["source"], "sns");
    assert_eq!(item["raw_payload"], ec2_critical());

    let resp = app.post("/v1/process?limit=1", None).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let summary = body_json(resp).await;
    assert_eq!(summary["processed_count"], 1);
    assert_eq!(summary["total_seen"], 1);

    let item = body_json(app.get(&format!("/v1/queue/{id}")).await).await;
    assert_eq!(item["status"], "processed");
    let alert_id = item["resulting_alert_id"].as_str().unwrap().to_string();

    let alert = body_json(app.get(&format!("/v1/alerts/{alert_id}")).await).await;
    assert_eq!(alert["service"], "EC2");
    assert_eq!(alert["severity"], "critical");
    assert_eq!(alert["resource_id"], "i-0123456789abcdef0");

    let alerts = body_json(app.get("/v1/alerts").await).await;
    assert_eq!(alerts["count"], 1);
    assert_eq!(app.store.alert_count().await, 1);
}

#[tokio::test]
async fn queue_listing_filters_by_status() {
    let app = TestApp::new(Some(TOKEN));
    app.post("/v1/webhooks", Some(json!({"Subject": "Weekly newsletter"})))
        .await;
    app.post("/v1/webhooks", Some(ec2_critical())).await;
    app.post("/v1/process", None).await;

    let discarded = body_json(app.get("/v1/queue?status=discarded").await).await;
    assert_eq!(discarded["count"], 1);
    assert_eq!(discarded["items"][0]["raw_payload"]["Subject"], "Weekly newsletter");

    let all = body_json(app.get("/v1/queue?limit=1").await).await;
    assert_eq!(all["count"], 1);

    let stats = body_json(app.get("/v1/queue/stats").await).await;
    assert_eq!(stats["total"], 2);
    assert_eq!(stats["processed"], 1);
    assert_eq!(stats["discarded"], 1);
    assert_eq!(stats["pending"], 0);
}

#[tokio::test]
async fn reprocess_resets_item_and_is_idempotent() {
    let app = TestApp::new(Some(TOKEN));
    let id = body_json(
        app.post("/v1/webhooks", Some(json!({"Subject": "Weekly newsletter"})))
            .await,
    )
    .await["id"]
        .as_str()
        .unwrap()
        .to_string();
    app.post("/v1/process", None).await;

    let first = app.post(&format!("/v1/queue/{id}/reprocess"), None).await;
    assert_eq!(first.status(), StatusCode::OK);
    let first = body_json(first).await;
    let second = body_json(app.post(&format!("/v1/queue/{id}/reprocess"), None).await).await;

    assert_eq!(first, second);
    assert_eq!(first["status"], "pending");
    assert!(first["processed_at"].is_null());
}

#[tokio::test]
async fn unknown_ids_are_404_with_json_error() {
    let app = TestApp::new(Some(TOKEN));
    for resp in [
        app.get("/v1/queue/missing").await,
        app.post("/v1/queue/missing/reprocess", None).await,
        app.get("/v1/alerts/missing").await,
    ] {
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let json = body_json(resp).await;
        assert!(json["error"].as_str().unwrap().contains("not found"));
    }
}

#[tokio::test]
async fn bad_input_is_400() {
    let app = TestApp::new(Some(TOKEN));

    let resp = app.get("/v1/queue?status=bogus").await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let resp = app.get("/v1/queue/stats?date=2026-02-30").await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let resp = app
        .app
        .clone()
        .oneshot(
            Request::post("/v1/webhooks")
                .header(header::AUTHORIZATION, format!("Bearer {TOKEN}"))
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from("{not json"))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert!(body_json(resp).await["error"].is_string());
}

#[tokio::test]
async fn process_survives_store_failures() {
    let app = TestApp::new(Some(TOKEN));
    app.post("/v1/webhooks", Some(ec2_critical())).await;
    app.store.fail_alert_inserts(true);

    let resp = app.post("/v1/process", None).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let summary = body_json(resp).await;
    assert_eq!(summary["error_count"], 1);

    let errored = body_json(app.get("/v1/queue?status=error").await).await;
    assert_eq!(errored["count"], 1);
    assert!(errored["items"][0]["error_message"].is_string());
}

#[tokio::test]
async fn clear_removes_listed_items_only() {
    let app = TestApp::new(Some(TOKEN));
    let mut ids = Vec::new();
    for _ in 0..3 {
        let created = body_json(app.post("/v1/webhooks", Some(ec2_critical())).await).await;
        ids.push(created["id"].as_str().unwrap().to_string());
    }

    let resp = app
        .post(
            "/v1/queue/clear",
            Some(json!({"ids": [ids[0], ids[1], "missing"]})),
        )
        .await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await["removed"], 2);

    let left = body_json(app.get("/v1/queue").await).await;
    assert_eq!(left["count"], 1);
    assert_eq!(left["items"][0]["id"], ids[2].as_str());

    let empty = body_json(app.post("/v1/queue/clear", Some(json!({"ids": []}))).await).await;
    assert_eq!(empty["removed"], 0);

    let resp = app.post("/v1/queue/clear", Some(json!({"id": "x"}))).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn oversized_batch_limit_is_capped() {
    let app = TestApp::new(Some(TOKEN));
    app.post("/v1/webhooks", Some(ec2_critical())).await;

    let resp = app
        .post(&format!("/v1/process?limit={}", usize::MAX), None)
        .await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await["processed_count"], 1);
}
