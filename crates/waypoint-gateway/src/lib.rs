// crates/waypoint-gateway/src/lib.rs
// ============================================================================
// Module: Waypoint Gateway
// Description: Per-domain tool gateway service.
// Purpose: Expose a fixed tool table over a domain backend with sessions.
// Dependencies: async-trait, axum, rand, reqwest, serde_json, thiserror,
//               waypoint-core
// ============================================================================

//! ## Overview
//! A tool gateway fronts exactly one travel domain backend. It owns a
//! session table with TTL expiry, a fixed per-domain tool table, and the
//! `POST /rpc` invoke operation. Business failures from the backend are
//! normalized into a single error-result shape; transport-level success is
//! preserved so callers can distinguish policy rejections (which never
//! reach this crate) from tool-level errors.
//!
//! ## Invariants
//! - The tool table is fixed at construction; unknown tools produce an
//!   `unsupported_tool` error result, never a transport error.
//! - An unknown or expired session yields a fresh session id together with
//!   a `session_expired` error result; the caller retries once.
//! - The session table mutex is held only across map operations, never
//!   across backend I/O.
//!
//! Security posture: the gateway trusts that enforcement already ran; it
//! performs no authorization of its own.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod backend;
pub mod service;
pub mod session;
pub mod tools;

pub use backend::Backend;
pub use backend::BackendError;
pub use backend::HttpBackend;
pub use backend::InMemoryBackend;
pub use service::GatewayState;
pub use service::router;
pub use session::SessionTable;
pub use tools::BackendOp;
pub use tools::ToolSpec;
pub use tools::catalog;
pub use tools::find_tool;
