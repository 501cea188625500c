// crates/waypoint-core/src/core/audit.rs
// ============================================================================
// Module: Audit Records
// Description: Enforcement outcomes and the per-call audit record.
// Purpose: Give every forwarded or blocked call exactly one audit entry.
// Dependencies: crate::core::identity, crate::core::time, serde
// ============================================================================

//! ## Overview
//! Every call evaluated by an enforcement point produces exactly one audit
//! record: timestamp, caller, target, path, and outcome. The outcome keeps
//! "denied by policy" distinct from "decision point unreachable" so the
//! audit trail never conflates a policy statement with an availability
//! failure, even though both block the call.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

use crate::core::identity::Identity;
use crate::core::time::Timestamp;

// ============================================================================
// SECTION: Outcomes
// ============================================================================

/// Outcome of an enforcement evaluation.
///
/// # Invariants
/// - Variants are stable for audit sinks and tests.
/// - `Unavailable` is never a policy statement; it is an availability fact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnforcementOutcome {
    /// Call was forwarded to the protected component.
    Allow,
    /// Call was rejected by policy.
    Deny,
    /// Call was rejected because the decision point could not be reached.
    Unavailable,
}

impl EnforcementOutcome {
    /// Returns a stable label for the outcome.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Allow => "allow",
            Self::Deny => "deny",
            Self::Unavailable => "unavailable",
        }
    }
}

// ============================================================================
// SECTION: Audit Record
// ============================================================================

/// Record of one enforcement evaluation.
///
/// # Invariants
/// - Exactly one record exists per evaluated call.
/// - `reason` is a stable label, never free-form backend text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditRecord {
    /// When the evaluation happened (host-supplied).
    pub at: Timestamp,
    /// Identity the caller presented.
    pub caller: Identity,
    /// Identity of the protected component.
    pub target: Identity,
    /// Request path on the protected component.
    pub path: String,
    /// Evaluation outcome.
    pub outcome: EnforcementOutcome,
    /// Stable reason label for the outcome.
    pub reason: String,
}
