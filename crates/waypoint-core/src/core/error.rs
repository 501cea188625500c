// crates/waypoint-core/src/core/error.rs
// ============================================================================
// Module: Error Taxonomy
// Description: Stable error kinds carried in failure responses.
// Purpose: Keep user-visible failures structured; never leak internals.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Every failure a component returns carries one of these stable kinds.
//! `Forbidden` and `DecisionUnavailable` are deliberately distinct: the
//! first is a policy statement (never retry), the second an availability
//! failure (safe to retry with backoff). `ToolError` is a business-level
//! error surfaced inside an otherwise successful protocol exchange.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Error Kinds
// ============================================================================

/// Stable failure classification for user-visible responses.
///
/// # Invariants
/// - Variants are stable for programmatic handling and never renamed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Malformed input or bad identifiers; rejected before any downstream call.
    Validation,
    /// Policy denied the call; not retryable.
    Forbidden,
    /// The policy decision point was unreachable; retryable with backoff.
    DecisionUnavailable,
    /// A worker agent, gateway, or backend was down or timed out.
    UpstreamUnavailable,
    /// Backend-reported business error carried in a successful exchange.
    ToolError,
}

impl ErrorKind {
    /// Returns a stable label for the error kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::Forbidden => "forbidden",
            Self::DecisionUnavailable => "decision_unavailable",
            Self::UpstreamUnavailable => "upstream_unavailable",
            Self::ToolError => "tool_error",
        }
    }
}

// ============================================================================
// SECTION: Error Body
// ============================================================================

/// Structured failure body returned to callers.
///
/// # Invariants
/// - `message` is user-facing text; never a stack trace or internal id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Stable failure classification.
    pub error_kind: ErrorKind,
    /// Human-readable description safe for end users.
    pub message: String,
}

impl ErrorBody {
    /// Creates an error body from a kind and message.
    #[must_use]
    pub fn new(error_kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            error_kind,
            message: message.into(),
        }
    }
}
