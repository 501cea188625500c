// crates/waypoint-pdp/src/service/tests.rs
// ============================================================================
// Module: PDP Service Tests
// Description: HTTP-level tests for the decide, health, and identity routes.
// Purpose: Verify the service answers decisions from in-memory state.
// ============================================================================

//! HTTP tests for the PDP service over a local listener.

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "Test-only assertions and helpers are permitted."
)]

use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::sync::Arc;

use waypoint_core::AuthorizationRequest;
use waypoint_core::Decision;
use waypoint_core::DecisionReason;
use waypoint_core::Identity;
use waypoint_core::PolicyRegistry;
use waypoint_core::RegistryEntry;
use waypoint_core::Role;

use super::PdpState;
use super::router;

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

async fn spawn_pdp() -> String {
    let state = Arc::new(PdpState::new(Identity::from("pdp"), sample_registry()));
    let app = router(state);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    format!("http://{addr}")
}

async fn post_decide(base: &str, caller: &str, target: &str, path: &str) -> Decision {
    let client = reqwest::Client::new();
    let response = client
        .post(format!("{base}/v1/decide"))
        .json(&AuthorizationRequest {
            caller: Identity::from(caller),
            target: Identity::from(target),
            path: path.to_string(),
        })
        .send()
        .await
        .expect("decide request");
    assert!(response.status().is_success());
    response.json().await.expect("decision body")
}

#[tokio::test]
async fn granted_edge_is_allowed_over_http() {
    let base = spawn_pdp().await;
    let decision = post_decide(&base, "hotel-agent", "hotel-gateway", "/rpc").await;
    assert!(decision.allow);
    assert_eq!(decision.reason, DecisionReason::EdgePermitted);
}

#[tokio::test]
async fn cross_domain_edge_is_denied_over_http() {
    let base = spawn_pdp().await;
    let decision = post_decide(&base, "hotel-agent", "airline-gateway", "/rpc").await;
    assert!(!decision.allow);
    assert_eq!(decision.reason, DecisionReason::TargetNotPermitted);
}

#[tokio::test]
async fn discovery_path_is_allowed_for_anyone() {
    let base = spawn_pdp().await;
    let decision = post_decide(&base, "nobody", "hotel-gateway", "/health").await;
    assert!(decision.allow);
    assert_eq!(decision.reason, DecisionReason::DiscoveryPath);
}

#[tokio::test]
async fn health_and_identity_are_served() {
    let base = spawn_pdp().await;
    let client = reqwest::Client::new();
    let health: serde_json::Value = client
        .get(format!("{base}/health"))
        .send()
        .await
        .expect("health request")
        .json()
        .await
        .expect("health body");
    assert_eq!(health["status"], "healthy");
    let identity: serde_json::Value = client
        .get(format!("{base}/identity"))
        .send()
        .await
        .expect("identity request")
        .json()
        .await
        .expect("identity body");
    assert_eq!(identity["identity"], "pdp");
    assert_eq!(identity["registered_entries"], 1);
}
