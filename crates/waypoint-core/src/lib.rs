// crates/waypoint-core/src/lib.rs
// ============================================================================
// Module: Waypoint Core
// Description: Pure domain model for identity-propagated routing and policy.
// Purpose: Provide the types and decision engine shared by every component.
// Dependencies: serde, serde_json, thiserror
// ============================================================================

//! ## Overview
//! Waypoint core holds the domain model for the zero-trust travel pipeline:
//! component identities, the policy registry and its default-deny decision
//! engine, authorization and audit records, the intent model, the dispatch
//! context snapshot, and the wire types exchanged between the orchestrator,
//! worker agents, and tool gateways.
//!
//! ## Layer Responsibilities
//! - Define stable, serializable types with no transport baggage.
//! - Evaluate authorization requests as a pure function of the registry.
//! - Never perform I/O, read the wall clock, or hold mutable global state.
//!
//! ## Invariants
//! - `PolicyRegistry::decide` is deterministic for identical inputs.
//! - Absence from the registry or from an `allowed_targets` set means deny.
//!
//! Security posture: every value crossing a component boundary is untrusted;
//! callers validate at the boundary, core types stay permissive containers.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod core;

pub use core::audit::AuditRecord;
pub use core::audit::EnforcementOutcome;
pub use core::authz::AuthorizationRequest;
pub use core::authz::Decision;
pub use core::authz::DecisionReason;
pub use core::context::DispatchContext;
pub use core::context::ItineraryItem;
pub use core::context::TripSummary;
pub use core::error::ErrorBody;
pub use core::error::ErrorKind;
pub use core::identity::Identity;
pub use core::identity::SessionId;
pub use core::intent::Domain;
pub use core::intent::Intent;
pub use core::intent::IntentKind;
pub use core::policy::DISCOVERY_PATHS;
pub use core::policy::PolicyRegistry;
pub use core::policy::RegistryEntry;
pub use core::policy::Role;
pub use core::time::Timestamp;
pub use core::wire::AgentRequest;
pub use core::wire::AgentResponse;
pub use core::wire::ERR_SESSION_EXPIRED;
pub use core::wire::ERR_UNSUPPORTED_TOOL;
pub use core::wire::HEADER_CALLER;
pub use core::wire::HEADER_ORCHESTRATOR;
pub use core::wire::HEADER_TARGET;
pub use core::wire::InvokeRequest;
pub use core::wire::InvokeResponse;
pub use core::wire::ToolResult;
