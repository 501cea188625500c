// crates/waypoint-enforce/src/lib.rs
// ============================================================================
// Module: Waypoint Enforce
// Description: Per-hop enforcement point for the zero-trust pipeline.
// Purpose: Gate every inbound call on an explicit policy decision.
// Dependencies: async-trait, axum, reqwest, serde_json, thiserror,
//               waypoint-core
// ============================================================================

//! ## Overview
//! The enforcement point sits in front of every protected service and asks
//! the policy decision point before any handler runs. It distinguishes
//! three outcomes strictly: allow (forward), deny (403, `forbidden`), and
//! decision unavailable (503, `decision_unavailable`). An unreachable PDP
//! is never treated as permission.
//!
//! ## Invariants
//! - Fail secure: no decision means no forwarding, ever.
//! - Deny and unavailable are distinct outcomes with distinct status codes
//!   and error bodies.
//! - Every evaluated call emits exactly one audit record.
//!
//! Security posture: this crate is the trust boundary for each hop; caller
//! identity is header-asserted, so the guarantee is confinement of honest
//! components, not authentication of hostile ones.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod audit;
pub mod decision;
pub mod middleware;

pub use audit::AuditSink;
pub use audit::JsonLineSink;
pub use audit::NullSink;
pub use audit::RecordingSink;
pub use decision::DecisionPoint;
pub use decision::DecisionPointError;
pub use decision::HttpDecisionPoint;
pub use decision::StaticDecisionPoint;
pub use middleware::CALLER_HEADER;
pub use middleware::Enforcer;
pub use middleware::protect;
