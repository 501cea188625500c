// crates/waypoint-config/src/lib.rs
// ============================================================================
// Module: Waypoint Config
// Description: Canonical TOML configuration model and validation.
// Purpose: Load component wiring, the policy registry, and timeouts once.
// Dependencies: serde, toml, url, waypoint-core
// ============================================================================

//! ## Overview
//! One TOML file describes the whole Waypoint deployment: the policy
//! registry (every identity and its allowed call edges), the PDP endpoint,
//! per-domain agent and gateway wiring, and every timeout. Configuration is
//! loaded once at startup and validated fail-closed: a config that refers
//! to an unregistered identity, an unparsable endpoint, or a zero timeout
//! never produces a running component.
//!
//! ## Invariants
//! - Every identity a component uses appears exactly once in the registry.
//! - Endpoints parse as absolute URLs; timeouts and TTLs are non-zero.
//!
//! Security posture: configuration is trusted operator input, but it is
//! still validated strictly because a permissive registry silently widens
//! the set of allowed call edges.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;

pub use config::AgentConfig;
pub use config::ConfigError;
pub use config::GatewayConfig;
pub use config::OrchestratorConfig;
pub use config::PdpConfig;
pub use config::RegistryEntryConfig;
pub use config::WaypointConfig;
