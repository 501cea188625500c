// crates/waypoint-agent/src/lib.rs
// ============================================================================
// Module: Waypoint Agent
// Description: Per-domain worker agent service.
// Purpose: Turn dispatched messages into tool invocations via ordered rules.
// Dependencies: axum, reqwest, serde_json, thiserror, waypoint-core
// ============================================================================

//! ## Overview
//! A worker agent owns one travel domain. Dispatch is a data-driven ordered
//! rule table: the first rule whose keywords match the message wins, its
//! extractor builds tool arguments from the dispatch context, and the
//! gateway client invokes the tool. Side-effecting rules additionally
//! require the explicit confirmation signal from the context; without it
//! the agent answers with a confirmation prompt and calls nothing.
//!
//! ## Invariants
//! - Rule order is priority order; most specific rules come first.
//! - The fallback classifier can produce text only; it can never cause a
//!   tool invocation.
//! - Session expiry is retried exactly once with the fresh id; transport
//!   failures are never retried.
//!
//! Security posture: the confirmation gate bounds what injected message
//! text can do; text alone can never trigger a booking or cancellation.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod agent;
pub mod fallback;
pub mod gateway_client;
pub mod rules;
pub mod service;

pub use agent::WorkerAgent;
pub use fallback::FallbackClassifier;
pub use fallback::StaticFallback;
pub use gateway_client::GatewayClient;
pub use gateway_client::GatewayClientError;
pub use rules::DispatchRule;
pub use rules::match_rule;
pub use rules::rules;
pub use service::AgentState;
pub use service::router;
