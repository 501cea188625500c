// crates/waypoint-agent/src/service.rs
// ============================================================================
// Module: Agent Service
// Description: Router and handlers for the worker agent HTTP surface.
// Purpose: Serve invoke, tool catalog, health, and identity.
// Dependencies: axum, serde_json, waypoint-core
// ============================================================================

//! ## Overview
//! `POST /invoke` accepts a dispatch envelope and runs the agent pipeline;
//! `GET /tools` serves the discovery catalog derived from the rule table.
//! The invoke handler is protocol-level infallible: agent failures ride in
//! the structured response body.

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
use waypoint_core::AgentRequest;
use waypoint_core::AgentResponse;

use crate::agent::WorkerAgent;

// ============================================================================
// SECTION: State
// ============================================================================

/// Shared state for one agent service.
pub struct AgentState {
    /// The worker agent behind this surface.
    pub agent: WorkerAgent,
}

impl AgentState {
    /// Builds the shared agent state.
    #[must_use]
    pub const fn new(agent: WorkerAgent) -> Self {
        Self {
            agent,
        }
    }
}

// ============================================================================
// SECTION: Router
// ============================================================================

/// Builds the agent router.
#[must_use]
pub fn router(state: Arc<AgentState>) -> Router {
    Router::new()
        .route("/invoke", post(invoke))
        .route("/tools", get(tools))
        .route("/health", get(health))
        .route("/identity", get(identity))
        .with_state(state)
}

// ============================================================================
// SECTION: Handlers
// ============================================================================

/// Processes one dispatched message.
async fn invoke(
    State(state): State<Arc<AgentState>>,
    Json(request): Json<AgentRequest>,
) -> Json<AgentResponse> {
    Json(state.agent.process(request).await)
}

/// Serves the tool catalog derived from the rule table.
async fn tools(State(state): State<Arc<AgentState>>) -> Json<Value> {
    Json(json!({
        "domain": state.agent.domain.as_str(),
        "tools": state.agent.tool_names(),
    }))
}

/// Reports liveness.
async fn health(State(state): State<Arc<AgentState>>) -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "component": "agent",
        "domain": state.agent.domain.as_str(),
    }))
}

/// Reports the agent identity.
async fn identity(State(state): State<Arc<AgentState>>) -> Json<Value> {
    Json(json!({
        "identity": state.agent.identity.as_str(),
        "domain": state.agent.domain.as_str(),
    }))
}
