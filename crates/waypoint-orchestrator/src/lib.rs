// crates/waypoint-orchestrator/src/lib.rs
// ============================================================================
// Module: Waypoint Orchestrator
// Description: Entry-point service for the travel request pipeline.
// Purpose: Classify intents, manage context, and dispatch to worker agents.
// Dependencies: async-trait, axum, reqwest, serde, serde_json, thiserror,
//               waypoint-core
// ============================================================================

//! ## Overview
//! The orchestrator runs a strictly ordered per-request pipeline: fetch the
//! caller's context, classify the message, handle it directly or dispatch
//! to the matching worker agent, post-process bookings into the itinerary,
//! and respond. It holds no authority of its own; every dispatched hop is
//! independently authorized by the enforcement point in front of the
//! target.
//!
//! ## Invariants
//! - Context is fetched once per request and passed down by value.
//! - An agent marked unhealthy gets one rediscovery probe before dispatch;
//!   when the probe misses, the request fails without reaching the agent.
//! - Itinerary appends are best-effort: an append failure is recorded but
//!   never flips a successful booking response into a failure.
//!
//! Security posture: the orchestrator forwards the caller's explicit
//! confirmation signal verbatim; it never infers confirmation from text.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod classify;
pub mod context_store;
pub mod orchestrator;
pub mod registry;
pub mod service;

pub use classify::classify;
pub use classify::extract_destination;
pub use context_store::ContextStore;
pub use context_store::ContextStoreError;
pub use context_store::HttpContextStore;
pub use context_store::InMemoryContextStore;
pub use orchestrator::ChatRequest;
pub use orchestrator::ChatResponse;
pub use orchestrator::Orchestrator;
pub use registry::AgentEntry;
pub use registry::AgentRegistry;
pub use service::OrchestratorState;
pub use service::router;
