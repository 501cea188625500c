// crates/waypoint-orchestrator/src/service.rs
// ============================================================================
// Module: Orchestrator Service
// Description: Router and handlers for the orchestrator HTTP surface.
// Purpose: Serve chat, agent snapshot, health, and identity.
// Dependencies: axum, serde_json, waypoint-core
// ============================================================================

//! ## Overview
//! `POST /chat` runs the orchestrator pipeline for one request. The chat
//! handler is protocol-level infallible: pipeline failures ride in the
//! structured response body. `GET /agents` exposes the registry snapshot
//! for operators.

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

use crate::orchestrator::ChatRequest;
use crate::orchestrator::ChatResponse;
use crate::orchestrator::Orchestrator;

// ============================================================================
// SECTION: State
// ============================================================================

/// Shared state for the orchestrator service.
pub struct OrchestratorState {
    /// The pipeline coordinator behind this surface.
    pub orchestrator: Orchestrator,
}

impl OrchestratorState {
    /// Builds the shared orchestrator state.
    #[must_use]
    pub const fn new(orchestrator: Orchestrator) -> Self {
        Self {
            orchestrator,
        }
    }
}

// ============================================================================
// SECTION: Router
// ============================================================================

/// Builds the orchestrator router.
#[must_use]
pub fn router(state: Arc<OrchestratorState>) -> Router {
    Router::new()
        .route("/chat", post(chat))
        .route("/agents", get(agents))
        .route("/health", get(health))
        .route("/identity", get(identity))
        .with_state(state)
}

// ============================================================================
// SECTION: Handlers
// ============================================================================

/// Handles one chat request.
async fn chat(
    State(state): State<Arc<OrchestratorState>>,
    Json(request): Json<ChatRequest>,
) -> Json<ChatResponse> {
    Json(state.orchestrator.handle(request).await)
}

/// Serves the agent registry snapshot.
async fn agents(State(state): State<Arc<OrchestratorState>>) -> Json<Value> {
    Json(state.orchestrator.registry_snapshot())
}

/// Reports liveness.
async fn health() -> Json<Value> {
    Json(json!({ "status": "healthy", "component": "orchestrator" }))
}

/// Reports the orchestrator identity.
async fn identity(State(state): State<Arc<OrchestratorState>>) -> Json<Value> {
    Json(json!({ "identity": state.orchestrator.identity.as_str() }))
}
