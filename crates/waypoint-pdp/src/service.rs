// crates/waypoint-pdp/src/service.rs
// ============================================================================
// Module: PDP Service
// Description: Router and handlers for the policy decision point.
// Purpose: Expose decide, health, and identity over HTTP.
// Dependencies: axum, serde_json, waypoint-core
// ============================================================================

//! ## Overview
//! Three routes: `POST /v1/decide` evaluates one authorization request
//! against the registry, `GET /health` reports liveness, and
//! `GET /identity` reports the PDP's own identity and registry size. The
//! decide route carries no authentication of its own: callers are
//! enforcement points inside the trust boundary, and the worst a spoofed
//! decide request can learn is a deny.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use axum::Json;
use axum::Router;
use axum::extract::State;
use axum::routing::get;
use axum::routing::post;
use serde_json::Value;
use serde_json::json;
use waypoint_core::AuthorizationRequest;
use waypoint_core::Decision;
use waypoint_core::Identity;
use waypoint_core::PolicyRegistry;

// ============================================================================
// SECTION: State
// ============================================================================

/// Shared state for the PDP service.
///
/// # Invariants
/// - `registry` is never mutated after construction.
#[derive(Debug)]
pub struct PdpState {
    /// The PDP's own identity.
    pub identity: Identity,
    /// Immutable policy registry.
    pub registry: PolicyRegistry,
}

impl PdpState {
    /// Builds the shared service state.
    #[must_use]
    pub const fn new(identity: Identity, registry: PolicyRegistry) -> Self {
        Self {
            identity,
            registry,
        }
    }
}

// ============================================================================
// SECTION: Router
// ============================================================================

/// Builds the PDP router.
#[must_use]
pub fn router(state: Arc<PdpState>) -> Router {
    Router::new()
        .route("/v1/decide", post(decide))
        .route("/health", get(health))
        .route("/identity", get(identity))
        .with_state(state)
}

// ============================================================================
// SECTION: Handlers
// ============================================================================

/// Evaluates one authorization request.
async fn decide(
    State(state): State<Arc<PdpState>>,
    Json(request): Json<AuthorizationRequest>,
) -> Json<Decision> {
    Json(state.registry.decide(&request))
}

/// Reports liveness.
async fn health() -> Json<Value> {
    Json(json!({ "status": "healthy", "component": "pdp" }))
}

/// Reports the PDP identity and registry size.
async fn identity(State(state): State<Arc<PdpState>>) -> Json<Value> {
    Json(json!({
        "identity": state.identity.as_str(),
        "registered_entries": state.registry.len(),
    }))
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests;
