//! HTTP tests for the gateway router, end to end via Axum `oneshot`

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use liveline_core::{AgentSpec, DeskConfig};
use liveline_desk::Desk;
use liveline_gateway::{app, AppState};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

fn make_state(agents: usize, max_sessions: usize, config: DeskConfig) -> Arc<AppState> {
    let roster: Vec<AgentSpec> = (1..=agents)
        .map(|i| AgentSpec {
            id: format!("a{i}"),
            name: format!("Agent {i}"),
            languages: vec!["en".into(), "sw".into()],
            max_sessions,
        })
        .collect();
    let desk = Arc::new(Desk::new(roster, config));
    Arc::new(AppState::new(desk))
}

fn make_app(agents: usize, max_sessions: usize) -> axum::Router {
    app(make_state(agents, max_sessions, DeskConfig::default()))
}

async fn post_json(router: &axum::Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let req = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    let resp = router.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

async fn get_json(router: &axum::Router, uri: &str) -> (StatusCode, Value) {
    let req = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    let resp = router.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

// ===========================================================================
// /api/agent/connect
// ===========================================================================

#[tokio::test]
async fn connect_returns_session_and_greeting() {
    let router = make_app(2, 1);

    let (status, body) = post_json(
        &router,
        "/api/agent/connect",
        json!({"userId": "u1", "language": "en"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert!(body["sessionId"].is_string());
    assert!(body["agentName"].is_string());
    assert!(body["message"].as_str().unwrap().contains("support agent"));
}

#[tokio::test]
async fn connect_over_capacity_reports_queue_position() {
    let router = make_app(1, 1);

    let (_, first) = post_json(&router, "/api/agent/connect", json!({"userId": "u1"})).await;
    assert_eq!(first["success"], true);

    let (status, second) =
        post_json(&router, "/api/agent/connect", json!({"userId": "u2"})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(second["queued"], true);
    assert_eq!(second["position"], 1);
}

#[tokio::test]
async fn connect_mints_user_id_when_absent() {
    let router = make_app(1, 1);
    let (status, body) = post_json(&router, "/api/agent/connect", json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
}

// ===========================================================================
// /api/agent/message and /api/agent/disconnect
// ===========================================================================

#[tokio::test]
async fn message_round_trip_and_not_found() {
    let router = make_app(1, 1);

    let (_, connected) =
        post_json(&router, "/api/agent/connect", json!({"userId": "u1"})).await;
    let session_id = connected["sessionId"].as_str().unwrap().to_string();

    let (status, reply) = post_json(
        &router,
        "/api/agent/message",
        json!({"sessionId": session_id, "message": "hello"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(reply["response"].is_string());
    assert!(reply["timestamp"].is_string());

    let (status, err) = post_json(
        &router,
        "/api/agent/message",
        json!({"sessionId": "bogus", "message": "hello"}),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(err["error"].as_str().unwrap().contains("not found"));
}

#[tokio::test]
async fn disconnect_frees_capacity_for_queued_user() {
    let router = make_app(1, 1);

    let (_, first) = post_json(&router, "/api/agent/connect", json!({"userId": "u1"})).await;
    let session_id = first["sessionId"].as_str().unwrap().to_string();

    let (_, queued) = post_json(&router, "/api/agent/connect", json!({"userId": "u2"})).await;
    assert_eq!(queued["queued"], true);

    let (status, body) = post_json(
        &router,
        "/api/agent/disconnect",
        json!({"sessionId": session_id}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);

    // The drain ran on release; u2's ticket is redeemable now.
    let (status, poll) = get_json(&router, "/api/agent/queue/u2").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(poll["success"], true);
    assert!(poll["sessionId"].is_string());
}

#[tokio::test]
async fn queue_poll_reports_waiting_before_capacity_frees() {
    let router = make_app(1, 1);

    post_json(&router, "/api/agent/connect", json!({"userId": "u1"})).await;
    post_json(&router, "/api/agent/connect", json!({"userId": "u2"})).await;

    let (status, poll) = get_json(&router, "/api/agent/queue/u2").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(poll["waiting"], true);
    assert_eq!(poll["position"], 1);

    let (_, unknown) = get_json(&router, "/api/agent/queue/nobody").await;
    assert_eq!(unknown["waiting"], false);
}

#[tokio::test]
async fn unredeemed_tickets_are_evicted_after_session_age() {
    let config = DeskConfig {
        max_session_age_secs: 0,
        ..DeskConfig::default()
    };
    let state = make_state(1, 1, config);
    let router = app(state.clone());

    post_json(&router, "/api/agent/connect", json!({"userId": "u1"})).await;
    let (_, queued) = post_json(&router, "/api/agent/connect", json!({"userId": "u2"})).await;
    assert_eq!(queued["queued"], true);
    assert_eq!(state.pending_tickets(), 1);

    // Any later poll sweeps tickets older than the session-age bound.
    get_json(&router, "/api/agent/queue/someone-else").await;
    assert_eq!(state.pending_tickets(), 0);

    // u2 is still in the desk queue, so polling without a ticket still
    // reports the position.
    let (_, poll) = get_json(&router, "/api/agent/queue/u2").await;
    assert_eq!(poll["waiting"], true);
    assert_eq!(poll["position"], 1);
}

// ===========================================================================
// /api/health and /api/chat
// ===========================================================================

#[tokio::test]
async fn health_reports_counts() {
    let router = make_app(2, 1);

    post_json(&router, "/api/agent/connect", json!({"userId": "u1"})).await;

    let (status, body) = get_json(&router, "/api/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["availableAgents"], 1);
    assert_eq!(body["activeSessions"], 1);
    assert_eq!(body["queueLength"], 0);
}

#[tokio::test]
async fn assist_answers_and_flags_live_agent_requests() {
    let router = make_app(1, 1);

    let (status, body) = post_json(
        &router,
        "/api/chat",
        json!({"message": "how do I renew my passport?", "language": "en"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["response"].as_str().unwrap().contains("passport"));
    assert_eq!(body["suggestLiveAgent"], false);

    let (_, body) = post_json(
        &router,
        "/api/chat",
        json!({"message": "I want to talk to a live agent please"}),
    )
    .await;
    assert_eq!(body["suggestLiveAgent"], true);

    let (status, _) = post_json(&router, "/api/chat", json!({"message": "  "})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
