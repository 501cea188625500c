// crates/waypoint-enforce/tests/middleware.rs
// ============================================================================
// Module: Enforcement Middleware Integration Tests
// Description: Live-listener tests for the per-hop enforcement layer.
// Purpose: Verify allow/deny/unavailable behavior and audit completeness.
// ============================================================================

//! End-to-end enforcement tests over local listeners and a real PDP.

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "Test-only assertions and helpers are permitted."
)]

use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;

use axum::Json;
use axum::Router;
use axum::routing::get;
use axum::routing::post;
use serde_json::Value;
use serde_json::json;
use waypoint_core::EnforcementOutcome;
use waypoint_core::Identity;
use waypoint_core::PolicyRegistry;
use waypoint_core::RegistryEntry;
use waypoint_core::Role;
use waypoint_enforce::CALLER_HEADER;
use waypoint_enforce::DecisionPoint;
use waypoint_enforce::Enforcer;
use waypoint_enforce::HttpDecisionPoint;
use waypoint_enforce::RecordingSink;
use waypoint_enforce::protect;
use waypoint_pdp::PdpState;

fn sample_registry() -> PolicyRegistry {
    let mut entries = BTreeMap::new();
    entries.insert(
        Identity::from("hotel-agent"),
        RegistryEntry {
            role: Role::Worker,
            allowed_targets: BTreeSet::from([Identity::from("hotel-gateway")]),
        },
    );
    PolicyRegistry::new(entries)
}

async fn rpc_handler() -> Json<Value> {
    Json(json!({ "ok": true }))
}

async fn health_handler() -> Json<Value> {
    Json(json!({ "status": "healthy" }))
}

fn inner_router() -> Router {
    Router::new().route("/rpc", post(rpc_handler)).route("/health", get(health_handler))
}

async fn spawn_pdp() -> String {
    let state = Arc::new(PdpState::new(Identity::from("pdp"), sample_registry()));
    let app = waypoint_pdp::router(state);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.expect("bind pdp");
    let addr = listener.local_addr().expect("pdp addr");
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    format!("http://{addr}")
}

async fn spawn_protected(decision_point: Arc<dyn DecisionPoint>) -> (String, Arc<RecordingSink>) {
    let sink = Arc::new(RecordingSink::new());
    let enforcer = Arc::new(Enforcer::new(
        Identity::from("hotel-gateway"),
        decision_point,
        Arc::clone(&sink) as Arc<dyn waypoint_enforce::AuditSink>,
    ));
    let app = protect(inner_router(), enforcer);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.expect("bind service");
    let addr = listener.local_addr().expect("service addr");
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    (format!("http://{addr}"), sink)
}

async fn spawn_with_live_pdp() -> (String, Arc<RecordingSink>) {
    let pdp_base = spawn_pdp().await;
    let decision_point =
        HttpDecisionPoint::new(pdp_base, Duration::from_secs(2)).expect("decision point");
    spawn_protected(Arc::new(decision_point)).await
}

/// Binds and immediately drops a listener to obtain a dead endpoint.
async fn dead_endpoint() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);
    format!("http://{addr}")
}

#[tokio::test]
async fn permitted_caller_passes_through() {
    let (base, sink) = spawn_with_live_pdp().await;
    let client = reqwest::Client::new();
    let response = client
        .post(format!("{base}/rpc"))
        .header(CALLER_HEADER, "hotel-agent")
        .json(&json!({}))
        .send()
        .await
        .expect("rpc request");
    assert_eq!(response.status(), reqwest::StatusCode::OK);
    let body: Value = response.json().await.expect("rpc body");
    assert_eq!(body["ok"], true);
    let records = sink.records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].outcome, EnforcementOutcome::Allow);
    assert_eq!(records[0].reason, "edge_permitted");
}

#[tokio::test]
async fn unpermitted_caller_is_denied_with_forbidden_body() {
    let (base, sink) = spawn_with_live_pdp().await;
    let client = reqwest::Client::new();
    let response = client
        .post(format!("{base}/rpc"))
        .header(CALLER_HEADER, "airline-agent")
        .json(&json!({}))
        .send()
        .await
        .expect("rpc request");
    assert_eq!(response.status(), reqwest::StatusCode::FORBIDDEN);
    let body: Value = response.json().await.expect("error body");
    assert_eq!(body["error_kind"], "forbidden");
    let records = sink.records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].outcome, EnforcementOutcome::Deny);
}

#[tokio::test]
async fn missing_caller_header_is_rejected_and_audited() {
    let (base, sink) = spawn_with_live_pdp().await;
    let client = reqwest::Client::new();
    let response =
        client.post(format!("{base}/rpc")).json(&json!({})).send().await.expect("rpc request");
    assert_eq!(response.status(), reqwest::StatusCode::UNAUTHORIZED);
    let body: Value = response.json().await.expect("error body");
    assert_eq!(body["error_kind"], "validation");
    let records = sink.records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].outcome, EnforcementOutcome::Deny);
    assert_eq!(records[0].reason, "missing_caller_header");
}

#[tokio::test]
async fn discovery_path_passes_without_caller_header() {
    let (base, sink) = spawn_with_live_pdp().await;
    let client = reqwest::Client::new();
    let response = client.get(format!("{base}/health")).send().await.expect("health request");
    assert_eq!(response.status(), reqwest::StatusCode::OK);
    let records = sink.records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].outcome, EnforcementOutcome::Allow);
    assert_eq!(records[0].reason, "discovery_path");
}

#[tokio::test]
async fn unreachable_pdp_fails_secure_with_unavailable() {
    let endpoint = dead_endpoint().await;
    let decision_point =
        HttpDecisionPoint::new(endpoint, Duration::from_millis(250)).expect("decision point");
    let (base, sink) = spawn_protected(Arc::new(decision_point)).await;
    let client = reqwest::Client::new();
    let response = client
        .post(format!("{base}/rpc"))
        .header(CALLER_HEADER, "hotel-agent")
        .json(&json!({}))
        .send()
        .await
        .expect("rpc request");
    assert_eq!(response.status(), reqwest::StatusCode::SERVICE_UNAVAILABLE);
    let body: Value = response.json().await.expect("error body");
    assert_eq!(body["error_kind"], "decision_unavailable");
    let records = sink.records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].outcome, EnforcementOutcome::Unavailable);
}

#[tokio::test]
async fn in_process_decision_point_enforces_the_same_policy() {
    let decision_point = waypoint_enforce::StaticDecisionPoint::new(sample_registry());
    let (base, sink) = spawn_protected(Arc::new(decision_point)).await;
    let client = reqwest::Client::new();
    let response = client
        .post(format!("{base}/rpc"))
        .header(CALLER_HEADER, "hotel-agent")
        .json(&json!({}))
        .send()
        .await
        .expect("rpc request");
    assert_eq!(response.status(), reqwest::StatusCode::OK);
    assert_eq!(sink.len(), 1);
}

#[tokio::test]
async fn every_evaluated_call_emits_exactly_one_record() {
    let (base, sink) = spawn_with_live_pdp().await;
    let client = reqwest::Client::new();
    for caller in ["hotel-agent", "airline-agent", "hotel-agent"] {
        let _ = client
            .post(format!("{base}/rpc"))
            .header(CALLER_HEADER, caller)
            .json(&json!({}))
            .send()
            .await
            .expect("rpc request");
    }
    assert_eq!(sink.len(), 3);
}
