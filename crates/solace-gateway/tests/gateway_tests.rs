// SPDX-FileCopyrightText: 2026 Solace Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP-level tests against the full router.

use std::sync::Arc;
use std::time::Duration;

use axum::body::{Body, to_bytes};
use axum::http::{Method, Request, StatusCode, header};
use axum::Router;
use serde_json::{Value, json};
use solace_core::StorageAdapter;
use solace_test_utils::TestHarness;
use tower::ServiceExt;

async fn call(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| {
            Value::String(String::from_utf8_lossy(&bytes).into_owned())
        })
    };
    (status, body)
}

fn post(action: &str, token: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(format!("/v1/chat?action={action}"))
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .method(Method::GET)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap()
}

async fn create_session(app: &Router, token: &str, mode: &str) -> String {
    let (status, body) = call(app, post("createSession", token, json!({ "mode": mode }))).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    body["session"]["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn health_is_public() {
    let h = TestHarness::new().await.unwrap();
    let app = h.router();

    let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
    let (status, body) = call(&app, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert!(body["version"].is_string());
    assert!(body["uptime_secs"].is_u64());
}

#[tokio::test]
async fn metrics_404_when_disabled_and_rendered_when_enabled() {
    let h = TestHarness::new().await.unwrap();
    let request = Request::builder().uri("/metrics").body(Body::empty()).unwrap();
    let (status, _) = call(&h.router(), request).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let h = TestHarness::builder()
        .with_metrics(Arc::new(|| "solace_requests_total 3\n".to_string()))
        .build()
        .await
        .unwrap();
    let request = Request::builder().uri("/metrics").body(Body::empty()).unwrap();
    let (status, body) = call(&h.router(), request).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.as_str().unwrap().contains("solace_requests_total"));
}

#[tokio::test]
async fn chat_requires_a_valid_token() {
    let h = TestHarness::new().await.unwrap();
    let app = h.router();

    let request = Request::builder()
        .method(Method::POST)
        .uri("/v1/chat?action=getSessions")
        .body(Body::empty())
        .unwrap();
    let (status, body) = call(&app, request).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body["error"].as_str().unwrap().contains("missing bearer token"));

    let (status, _) = call(&app, get("/v1/chat?action=getSessions", "not.a.jwt")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let expired = h.token_with("alice", -3600);
    let (status, body) = call(&app, get("/v1/chat?action=getSessions", &expired)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body["error"].as_str().unwrap().contains("expired"));

    let token = h.token_for("alice");
    let (status, body) = call(&app, get("/v1/chat?action=getSessions", &token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["sessions"], json!([]));
}

#[tokio::test]
async fn missing_or_unknown_action_is_bad_request() {
    let h = TestHarness::new().await.unwrap();
    let app = h.router();
    let token = h.token_for("alice");

    let (status, body) = call(&app, get("/v1/chat", &token)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("action"));

    let (status, body) = call(&app, post("deleteSession", &token, json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("deleteSession"));
}

#[tokio::test]
async fn unparseable_query_string_is_json_bad_request() {
    let h = TestHarness::new().await.unwrap();
    let app = h.router();
    let token = h.token_for("alice");

    let response = app
        .clone()
        .oneshot(get("/v1/chat?action=getSessions&action=getSessions", &token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "application/json"
    );
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert!(body["error"].as_str().unwrap().contains("action"));
}

#[tokio::test]
async fn malformed_body_is_bad_request() {
    let h = TestHarness::new().await.unwrap();
    let app = h.router();
    let token = h.token_for("alice");

    let request = Request::builder()
        .method(Method::POST)
        .uri("/v1/chat?action=sendMessage")
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::from("{not json"))
        .unwrap();
    let (status, body) = call(&app, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    let (status, _) = call(&app, post("sendMessage", &token, json!({ "message": "hi" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn full_conversation_over_http() {
    let h = TestHarness::builder()
        .with_mock_responses(vec!["What would feel like progress today?".into()])
        .build()
        .await
        .unwrap();
    let app = h.router();
    let token = h.token_for("alice");

    let session_id = create_session(&app, &token, "rebuild").await;

    let (status, body) = call(
        &app,
        post(
            "sendMessage",
            &token,
            json!({ "sessionId": session_id, "message": "I want to get back into running" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["reply"], "What would feel like progress today?");
    assert_eq!(body["remainingToday"], 49);
    assert_eq!(body["userMessage"]["role"], "user");
    assert_eq!(body["assistantMessage"]["mode"], "rebuild");

    let (status, body) = call(
        &app,
        get(&format!("/v1/chat?action=getMessages&sessionId={session_id}"), &token),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["messages"].as_array().unwrap().len(), 2);

    let (status, body) = call(
        &app,
        post("getMessages", &token, json!({ "sessionId": session_id })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["messages"][1]["content"], "What would feel like progress today?");

    let (status, body) = call(&app, get("/v1/chat?action=getSessions", &token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["sessions"][0]["message_count"], 2);
    assert_eq!(body["sessions"][0]["title"], "I want to get back into running");

    let (status, body) = call(&app, get("/v1/chat?action=getUserStats", &token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["totalSessions"], 1);
    assert_eq!(body["messagesToday"], 1);
    assert_eq!(body["remainingToday"], 49);
    assert_eq!(body["sessionsByMode"]["rebuild"], 1);
    assert_eq!(body["sessionsByMode"]["reflect"], 0);
}

#[tokio::test]
async fn get_messages_requires_session_id() {
    let h = TestHarness::new().await.unwrap();
    let app = h.router();
    let token = h.token_for("alice");

    let (status, body) = call(&app, get("/v1/chat?action=getMessages", &token)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("sessionId"));
}

#[tokio::test]
async fn foreign_session_is_not_found() {
    let h = TestHarness::new().await.unwrap();
    let app = h.router();
    let alice = h.token_for("alice");
    let mallory = h.token_for("mallory");

    let session_id = create_session(&app, &alice, "reflect").await;

    let (status, body) = call(
        &app,
        get(&format!("/v1/chat?action=getMessages&sessionId={session_id}"), &mallory),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "not found: session not found");

    let (status, _) = call(
        &app,
        post("sendMessage", &mallory, json!({ "sessionId": session_id, "message": "hi" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn daily_limit_returns_429() {
    let h = TestHarness::builder().with_daily_limit(2).build().await.unwrap();
    let app = h.router();
    let token = h.token_for("alice");
    let session_id = create_session(&app, &token, "evolve").await;

    for _ in 0..2 {
        let (status, _) = call(
            &app,
            post("sendMessage", &token, json!({ "sessionId": session_id, "message": "go" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    let (status, body) = call(
        &app,
        post("sendMessage", &token, json!({ "sessionId": session_id, "message": "go" })),
    )
    .await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    assert!(body["error"].as_str().unwrap().contains("daily message limit of 2"));
}

#[tokio::test]
async fn provider_failure_is_500_with_message() {
    let h = TestHarness::new().await.unwrap();
    h.mock_provider
        .add_failure("OpenAI API error (insufficient_quota): You exceeded your current quota")
        .await;
    let app = h.router();
    let token = h.token_for("alice");
    let session_id = create_session(&app, &token, "recover").await;

    let (status, body) = call(
        &app,
        post("sendMessage", &token, json!({ "sessionId": session_id, "message": "hello" })),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(
        body["error"]
            .as_str()
            .unwrap()
            .contains("You exceeded your current quota")
    );
}

#[tokio::test]
async fn cors_preflight_is_answered() {
    let h = TestHarness::new().await.unwrap();
    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/v1/chat?action=sendMessage")
        .header(header::ORIGIN, "https://app.example.com")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "authorization,content-type")
        .body(Body::empty())
        .unwrap();
    let response = h.router().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(
        response
            .headers()
            .contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN)
    );
}

#[tokio::test]
async fn slow_provider_hits_request_timeout() {
    let h = TestHarness::builder()
        .with_request_timeout_secs(1)
        .build()
        .await
        .unwrap();
    let app = h.router();
    let token = h.token_for("alice");
    let session_id = create_session(&app, &token, "reflect").await;

    h.mock_provider.set_delay(Duration::from_secs(5)).await;
    let (status, _) = call(
        &app,
        post("sendMessage", &token, json!({ "sessionId": session_id, "message": "hello?" })),
    )
    .await;
    assert_eq!(status, StatusCode::REQUEST_TIMEOUT);

    assert_eq!(h.mock_provider.call_count().await, 1);
    assert!(h.storage.get_messages(&session_id, None).await.unwrap().is_empty());
}
