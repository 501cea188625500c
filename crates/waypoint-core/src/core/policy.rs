// crates/waypoint-core/src/core/policy.rs
// ============================================================================
// Module: Policy Registry & Decision Engine
// Description: Registered caller->target edges and the default-deny decider.
// Purpose: Evaluate authorization requests as a pure function of the registry.
// Dependencies: crate::core::authz, crate::core::identity, serde
// ============================================================================

//! ## Overview
//! The policy registry enumerates every identity a real component uses and
//! the exhaustive whitelist of targets that identity may call. Least
//! privilege here means every edge is enumerated, not inferred: there are no
//! wildcards, no partial matches, and no identity hierarchy.
//!
//! ## Invariants
//! - `decide` is deterministic: identical requests yield identical decisions.
//! - An unregistered caller is denied on every non-discovery path.
//! - A registered caller is allowed only toward members of its
//!   `allowed_targets` set.
//!
//! Security posture: the registry is loaded once at startup and never
//! mutated by requests; it is safe for unsynchronized concurrent reads.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::collections::BTreeSet;

use serde::Deserialize;
use serde::Serialize;

use crate::core::authz::AuthorizationRequest;
use crate::core::authz::Decision;
use crate::core::authz::DecisionReason;
use crate::core::identity::Identity;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Unauthenticated discovery paths allowed without a registry lookup.
///
/// Every component exposes these surfaces for liveness probes, capability
/// discovery, and identity introspection.
pub const DISCOVERY_PATHS: &[&str] = &["/health", "/tools", "/identity"];

// ============================================================================
// SECTION: Registry Types
// ============================================================================

/// Role a registered identity plays in the pipeline.
///
/// # Invariants
/// - Variants are stable for configuration parsing and audit labeling.
/// - The role labels an identity for operators; it grants no permissions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Front-of-chain orchestrating component.
    Supervisor,
    /// Domain worker agent or tool gateway.
    Worker,
}

impl Role {
    /// Returns a stable label for the role.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Supervisor => "supervisor",
            Self::Worker => "worker",
        }
    }
}

/// Registry entry for a single identity.
///
/// # Invariants
/// - `allowed_targets` is the exhaustive whitelist of callable identities;
///   absence means implicit deny.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryEntry {
    /// Role this identity plays.
    pub role: Role,
    /// Identities this entry may call.
    pub allowed_targets: BTreeSet<Identity>,
}

/// Immutable registry of identities and their permitted call edges.
///
/// # Invariants
/// - Each identity has exactly one entry.
/// - The registry is never mutated after construction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyRegistry {
    /// Entries keyed by registered identity.
    entries: BTreeMap<Identity, RegistryEntry>,
}

impl PolicyRegistry {
    /// Creates a registry from pre-validated entries.
    #[must_use]
    pub const fn new(entries: BTreeMap<Identity, RegistryEntry>) -> Self {
        Self {
            entries,
        }
    }

    /// Returns the entry for an identity when registered.
    #[must_use]
    pub fn entry(&self, identity: &Identity) -> Option<&RegistryEntry> {
        self.entries.get(identity)
    }

    /// Returns the number of registered identities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true when no identities are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Evaluates an authorization request against the registry.
    ///
    /// The decision is a pure function of the registry and the request: no
    /// hidden state, no clock, no randomness. This function never fails;
    /// callers treat decision-point *unreachability* as a separate outcome.
    #[must_use]
    pub fn decide(&self, request: &AuthorizationRequest) -> Decision {
        if is_discovery_path(&request.path) {
            return Decision::allow(DecisionReason::DiscoveryPath);
        }
        let Some(entry) = self.entries.get(&request.caller) else {
            return Decision::deny(DecisionReason::UnknownCaller);
        };
        if entry.allowed_targets.contains(&request.target) {
            Decision::allow(DecisionReason::EdgePermitted)
        } else {
            Decision::deny(DecisionReason::TargetNotPermitted)
        }
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Returns true when the path is in the fixed unauthenticated discovery set.
#[must_use]
pub fn is_discovery_path(path: &str) -> bool {
    DISCOVERY_PATHS.contains(&path)
}

// ============================================================================
// SECTION: Tests
// ============================================================================
