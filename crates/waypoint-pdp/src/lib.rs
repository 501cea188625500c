// crates/waypoint-pdp/src/lib.rs
// ============================================================================
// Module: Waypoint PDP
// Description: Policy decision point HTTP service.
// Purpose: Serve decide requests over the core decision engine.
// Dependencies: axum, serde_json, tokio, waypoint-core
// ============================================================================

//! ## Overview
//! The policy decision point is a thin HTTP shell around
//! [`waypoint_core::PolicyRegistry::decide`]. It holds the registry as
//! read-only shared state and answers every decide request from memory, so
//! a decision never depends on any collaborator being reachable.
//!
//! ## Invariants
//! - The decide handler is infallible at the protocol level: every
//!   well-formed request produces a decision document.
//! - The registry is immutable for the lifetime of the service.
//!
//! Security posture: the PDP is the root of authorization for the whole
//! pipeline; it defaults to deny and exposes no mutation surface.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod service;

pub use service::PdpState;
pub use service::router;
