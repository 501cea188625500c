// crates/waypoint-gateway/src/service.rs
// ============================================================================
// Module: Gateway Service
// Description: Router and handlers for the tool gateway.
// Purpose: Serve tool invocation, catalog, health, and identity.
// Dependencies: axum, serde_json, waypoint-core
// ============================================================================

//! ## Overview
//! `POST /rpc` is the single invocation operation: it resolves the session,
//! looks the tool up in the fixed domain table, and dispatches to the
//! backend. Tool-level failures ride inside the response as error results;
//! the handler itself is infallible at the protocol level. `GET /tools`
//! serves the discovery catalog.

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
use waypoint_core::Domain;
use waypoint_core::ERR_SESSION_EXPIRED;
use waypoint_core::ERR_UNSUPPORTED_TOOL;
use waypoint_core::Identity;
use waypoint_core::InvokeRequest;
use waypoint_core::InvokeResponse;
use waypoint_core::ToolResult;

use crate::backend::Backend;
use crate::backend::BackendError;
use crate::session::SessionTable;
use crate::tools::BackendOp;
use crate::tools::catalog;
use crate::tools::find_tool;

// ============================================================================
// SECTION: State
// ============================================================================

/// Shared state for one gateway instance.
///
/// # Invariants
/// - `domain` fixes the tool table for the lifetime of the service.
pub struct GatewayState {
    /// The gateway's own identity.
    pub identity: Identity,
    /// Travel domain this gateway serves.
    pub domain: Domain,
    /// TTL session table; the only mutable shared state.
    pub sessions: SessionTable,
    /// Record-of-truth collaborator.
    pub backend: Arc<dyn Backend>,
}

impl GatewayState {
    /// Builds the shared gateway state.
    #[must_use]
    pub const fn new(
        identity: Identity,
        domain: Domain,
        sessions: SessionTable,
        backend: Arc<dyn Backend>,
    ) -> Self {
        Self {
            identity,
            domain,
            sessions,
            backend,
        }
    }
}

// ============================================================================
// SECTION: Router
// ============================================================================

/// Builds the gateway router.
#[must_use]
pub fn router(state: Arc<GatewayState>) -> Router {
    Router::new()
        .route("/rpc", post(rpc))
        .route("/tools", get(tools))
        .route("/health", get(health))
        .route("/identity", get(identity))
        .with_state(state)
}

// ============================================================================
// SECTION: Handlers
// ============================================================================

/// Invokes one tool under a session.
async fn rpc(
    State(state): State<Arc<GatewayState>>,
    Json(request): Json<InvokeRequest>,
) -> Json<InvokeResponse> {
    // Session resolution happens entirely before backend I/O.
    let session_id = match request.session_id {
        None => state.sessions.create(),
        Some(id) if state.sessions.validate(&id) => id,
        Some(_) => {
            let fresh = state.sessions.create();
            return Json(InvokeResponse {
                session_id: fresh,
                result: ToolResult::err(ERR_SESSION_EXPIRED),
            });
        }
    };

    let Some(spec) = find_tool(state.domain, &request.tool_name) else {
        return Json(InvokeResponse {
            session_id,
            result: ToolResult::err(ERR_UNSUPPORTED_TOOL),
        });
    };

    let outcome = match spec.op {
        BackendOp::Search => state.backend.search(&request.arguments).await,
        BackendOp::Book => state.backend.book(&request.arguments).await,
        BackendOp::Get => state.backend.get(&request.arguments).await,
        BackendOp::Cancel => state.backend.cancel(&request.arguments).await,
    };
    let result = match outcome {
        Ok(value) => ToolResult::ok(value),
        Err(BackendError::Rejected(message)) => ToolResult::err(message),
        Err(BackendError::Unavailable(_)) => ToolResult::err("backend_unavailable"),
    };
    Json(InvokeResponse {
        session_id,
        result,
    })
}

/// Serves the discovery tool catalog.
async fn tools(State(state): State<Arc<GatewayState>>) -> Json<Value> {
    let entries: Vec<Value> = catalog(state.domain)
        .iter()
        .map(|spec| json!({ "name": spec.name, "description": spec.description }))
        .collect();
    Json(json!({ "domain": state.domain.as_str(), "tools": entries }))
}

/// Reports liveness.
async fn health(State(state): State<Arc<GatewayState>>) -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "component": "gateway",
        "domain": state.domain.as_str(),
    }))
}

/// Reports the gateway identity.
async fn identity(State(state): State<Arc<GatewayState>>) -> Json<Value> {
    Json(json!({
        "identity": state.identity.as_str(),
        "domain": state.domain.as_str(),
    }))
}
