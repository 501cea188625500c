// crates/waypoint-core/src/core/wire.rs
// ============================================================================
// Module: Wire Types
// Description: Request/response shapes exchanged between pipeline components.
// Purpose: Keep the orchestrator->agent and agent->gateway contracts stable.
// Dependencies: crate::core::context, crate::core::identity, serde, serde_json
// ============================================================================

//! ## Overview
//! These are the shared wire contracts: the dispatch envelope the
//! orchestrator sends a worker agent, the agent's structured response, and
//! the thin RPC shapes for gateway tool invocation. Business failures ride
//! inside [`ToolResult`] as protocol-level successes; transport failures are
//! HTTP-level and never spoofed into tool results.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;

use crate::core::context::DispatchContext;
use crate::core::identity::SessionId;

// ============================================================================
// SECTION: Identity Headers
// ============================================================================

/// Header carrying the asserted caller identity on every hop.
pub const HEADER_CALLER: &str = "x-caller-id";

/// Header carrying the originating orchestrator identity.
pub const HEADER_ORCHESTRATOR: &str = "x-orchestrator-id";

/// Header naming the intended target of the call.
pub const HEADER_TARGET: &str = "x-target-id";

// ============================================================================
// SECTION: Error Labels
// ============================================================================

/// Error label returned for a tool name missing from the gateway table.
pub const ERR_UNSUPPORTED_TOOL: &str = "unsupported_tool";

/// Error label returned when a presented session id is unknown or expired.
pub const ERR_SESSION_EXPIRED: &str = "session_expired";

// ============================================================================
// SECTION: Agent Contract
// ============================================================================

/// Dispatch request from the orchestrator to a worker agent.
///
/// # Invariants
/// - `context` is a by-value snapshot; the agent never mutates shared state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentRequest {
    /// Natural-language message to act on.
    pub message: String,
    /// Optional dispatch context snapshot.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<DispatchContext>,
}

/// Structured response from a worker agent.
///
/// # Invariants
/// - `tools_called` lists every attempted tool invocation in order,
///   regardless of each tool's own success or failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentResponse {
    /// Whether the agent handled the request.
    pub success: bool,
    /// Human-readable response text.
    pub message: String,
    /// Structured payload (search results, booking confirmation, ...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    /// Audit trail of attempted tool invocations.
    #[serde(default)]
    pub tools_called: Vec<String>,
    /// Stable error label when `success` is false.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AgentResponse {
    /// Creates a successful response with no tool calls.
    #[must_use]
    pub fn text(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: None,
            tools_called: Vec::new(),
            error: None,
        }
    }

    /// Creates a failed response with a stable error label.
    #[must_use]
    pub fn failure(message: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            data: None,
            tools_called: Vec::new(),
            error: Some(error.into()),
        }
    }
}

// ============================================================================
// SECTION: Gateway Contract
// ============================================================================

/// Tool invocation request from a worker agent to its gateway.
///
/// # Invariants
/// - An absent `session_id` asks the gateway to establish a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvokeRequest {
    /// Session established on a prior call, when one is held.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<SessionId>,
    /// Name of the tool to invoke.
    pub tool_name: String,
    /// Tool arguments as a JSON object.
    #[serde(default)]
    pub arguments: Value,
}

/// Result of a tool invocation.
///
/// # Invariants
/// - `Err` carries a single normalized string; callers never see
///   backend-specific error shapes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ToolResult {
    /// Successful tool result payload.
    Ok {
        /// Normalized result value.
        ok: Value,
    },
    /// Business or protocol error carried as a protocol-level success.
    Err {
        /// Normalized error text.
        error: String,
    },
}

impl ToolResult {
    /// Creates a successful tool result.
    #[must_use]
    pub const fn ok(value: Value) -> Self {
        Self::Ok {
            ok: value,
        }
    }

    /// Creates an error tool result.
    #[must_use]
    pub fn err(error: impl Into<String>) -> Self {
        Self::Err {
            error: error.into(),
        }
    }

    /// Returns the error text when this result is an error.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Ok {
                ..
            } => None,
            Self::Err {
                error,
            } => Some(error.as_str()),
        }
    }

    /// Returns the success payload when this result is ok.
    #[must_use]
    pub const fn value(&self) -> Option<&Value> {
        match self {
            Self::Ok {
                ok,
            } => Some(ok),
            Self::Err {
                ..
            } => None,
        }
    }
}

/// Tool invocation response from a gateway.
///
/// # Invariants
/// - `session_id` is always present; a fresh id is minted when the caller's
///   session was absent or expired.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvokeResponse {
    /// Session the call ran under, or a fresh replacement session.
    pub session_id: SessionId,
    /// Invocation result.
    pub result: ToolResult,
}
