// crates/waypoint-config/src/config/tests.rs
// ============================================================================
// Module: Configuration Model Tests
// Description: Unit tests for parsing, defaults, and fail-closed validation.
// Purpose: Guard the invariant that invalid wiring never loads.
// ============================================================================

//! Unit tests for the configuration model.

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "Test-only assertions and helpers are permitted."
)]

use waypoint_core::AuthorizationRequest;
use waypoint_core::Domain;
use waypoint_core::Identity;

use super::ConfigError;
use super::DEFAULT_DECIDE_TIMEOUT_MS;
use super::DEFAULT_SESSION_TTL_SECS;
use super::WaypointConfig;

/// A minimal but complete deployment: one domain wired end to end.
fn full_toml() -> String {
    r#"
        [registry.orchestrator]
        role = "supervisor"
        allowed_targets = ["hotel-agent"]

        [registry.hotel-agent]
        role = "worker"
        allowed_targets = ["hotel-gateway"]

        [registry.hotel-gateway]
        role = "worker"
        allowed_targets = []

        [pdp]
        identity = "pdp"
        endpoint = "http://127.0.0.1:8100"
        listen = "127.0.0.1:8100"

        [orchestrator]
        identity = "orchestrator"
        listen = "127.0.0.1:8000"
        context_endpoint = "http://127.0.0.1:9000"

        [agents.lodging]
        identity = "hotel-agent"
        endpoint = "http://127.0.0.1:8002"
        listen = "127.0.0.1:8002"
        gateway_identity = "hotel-gateway"
        gateway_endpoint = "http://127.0.0.1:8012"

        [gateways.lodging]
        identity = "hotel-gateway"
        listen = "127.0.0.1:8012"
        backend_endpoint = "http://127.0.0.1:9002"
    "#
    .to_string()
}

#[test]
fn full_config_parses_and_validates() {
    let config = WaypointConfig::from_toml(&full_toml()).expect("config should load");
    assert_eq!(config.registry.len(), 3);
    assert_eq!(config.pdp.decide_timeout_ms, DEFAULT_DECIDE_TIMEOUT_MS);
    let gateway = config.gateway(Domain::Lodging).expect("lodging gateway wired");
    assert_eq!(gateway.session_ttl_secs, DEFAULT_SESSION_TTL_SECS);
    assert!(config.agent(Domain::Flights).is_none());
}

#[test]
fn policy_registry_reflects_the_config() {
    let config = WaypointConfig::from_toml(&full_toml()).expect("config should load");
    let registry = config.policy_registry();
    let decision = registry.decide(&AuthorizationRequest {
        caller: Identity::from("hotel-agent"),
        target: Identity::from("hotel-gateway"),
        path: "/rpc".to_string(),
    });
    assert!(decision.allow);
    let decision = registry.decide(&AuthorizationRequest {
        caller: Identity::from("hotel-gateway"),
        target: Identity::from("hotel-agent"),
        path: "/rpc".to_string(),
    });
    assert!(!decision.allow);
}

#[test]
fn unregistered_orchestrator_identity_is_rejected() {
    let toml = full_toml().replace("identity = \"orchestrator\"", "identity = \"ghost\"");
    let err = WaypointConfig::from_toml(&toml).expect_err("ghost identity must fail");
    assert!(matches!(err, ConfigError::UnregisteredIdentity(identity) if identity == "ghost"));
}

#[test]
fn unknown_domain_key_is_rejected() {
    let toml = full_toml().replace("agents.lodging", "agents.cruises");
    let err = WaypointConfig::from_toml(&toml).expect_err("unknown domain must fail");
    assert!(matches!(err, ConfigError::UnknownDomain(domain) if domain == "cruises"));
}

#[test]
fn agent_without_matching_gateway_is_rejected() {
    let toml = full_toml().replace("[gateways.lodging]", "[gateways.flights]");
    let err = WaypointConfig::from_toml(&toml).expect_err("unpaired domain must fail");
    assert!(matches!(err, ConfigError::IncompleteDomain(_)));
}

#[test]
fn gateway_identity_mismatch_is_rejected() {
    let toml = full_toml().replace(
        "gateway_identity = \"hotel-gateway\"",
        "gateway_identity = \"other-gateway\"",
    );
    let err = WaypointConfig::from_toml(&toml).expect_err("identity mismatch must fail");
    assert!(matches!(err, ConfigError::IncompleteDomain(domain) if domain == "lodging"));
}

#[test]
fn relative_endpoint_is_rejected() {
    let toml = full_toml().replace("http://127.0.0.1:9000", "not-a-url");
    let err = WaypointConfig::from_toml(&toml).expect_err("bad endpoint must fail");
    assert!(matches!(err, ConfigError::InvalidEndpoint { .. }));
}

#[test]
fn zero_timeout_is_rejected() {
    let toml = full_toml().replace(
        "listen = \"127.0.0.1:8100\"",
        "listen = \"127.0.0.1:8100\"\n        decide_timeout_ms = 0",
    );
    let err = WaypointConfig::from_toml(&toml).expect_err("zero timeout must fail");
    assert!(matches!(err, ConfigError::ZeroDuration(_)));
}

#[test]
fn empty_registry_identity_is_rejected() {
    let toml = full_toml().replace("[registry.hotel-gateway]", "[registry.\" \"]");
    let err = WaypointConfig::from_toml(&toml).expect_err("blank identity must fail");
    assert!(matches!(err, ConfigError::EmptyIdentity(_)));
}

#[test]
fn malformed_toml_is_rejected() {
    let err = WaypointConfig::from_toml("registry = ]broken[").expect_err("parse must fail");
    assert!(matches!(err, ConfigError::Parse(_)));
}
