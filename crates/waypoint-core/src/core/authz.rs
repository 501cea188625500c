// crates/waypoint-core/src/core/authz.rs
// ============================================================================
// Module: Authorization Types
// Description: Per-hop authorization requests and decisions.
// Purpose: Carry caller/target/path metadata between enforcement and the PDP.
// Dependencies: crate::core::identity, serde
// ============================================================================

//! ## Overview
//! An authorization request is constructed fresh for every hop and never
//! persisted. The decision derived from it carries a closed reason set so
//! audit sinks and tests can distinguish deny causes without string
//! matching.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

use crate::core::identity::Identity;

// ============================================================================
// SECTION: Authorization Request
// ============================================================================

/// Per-hop authorization request.
///
/// # Invariants
/// - Built fresh per hop from request metadata; never persisted.
/// - `caller` is asserted, not verified; the registry decides trust.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorizationRequest {
    /// Identity the caller presented.
    pub caller: Identity,
    /// Identity of the protected component being called.
    pub target: Identity,
    /// Request path on the target component.
    pub path: String,
}

// ============================================================================
// SECTION: Decision
// ============================================================================

/// Reason attached to an authorization decision.
///
/// # Invariants
/// - Variants are stable for audit records and programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionReason {
    /// Path is in the fixed unauthenticated discovery set.
    DiscoveryPath,
    /// Caller is registered and the target is in its allowed set.
    EdgePermitted,
    /// Caller identity is not present in the registry.
    UnknownCaller,
    /// Target is not in the caller's allowed set.
    TargetNotPermitted,
}

impl DecisionReason {
    /// Returns a stable label for the reason.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::DiscoveryPath => "discovery_path",
            Self::EdgePermitted => "edge_permitted",
            Self::UnknownCaller => "unknown_caller",
            Self::TargetNotPermitted => "target_not_permitted",
        }
    }
}

/// Authorization decision derived from the registry and a request.
///
/// # Invariants
/// - Derived purely from registry and request; repeated identical requests
///   always decide identically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decision {
    /// Whether the call may proceed.
    pub allow: bool,
    /// Reason for the decision.
    pub reason: DecisionReason,
}

impl Decision {
    /// Creates an allow decision with the provided reason.
    #[must_use]
    pub const fn allow(reason: DecisionReason) -> Self {
        Self {
            allow: true,
            reason,
        }
    }

    /// Creates a deny decision with the provided reason.
    #[must_use]
    pub const fn deny(reason: DecisionReason) -> Self {
        Self {
            allow: false,
            reason,
        }
    }
}
