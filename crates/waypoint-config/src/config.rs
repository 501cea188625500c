// crates/waypoint-config/src/config.rs
// ============================================================================
// Module: Configuration Model
// Description: Deployment configuration structs, loading, and validation.
// Purpose: Turn one TOML file into validated component wiring.
// Dependencies: serde, toml, url, waypoint-core
// ============================================================================

//! ## Overview
//! The configuration model mirrors the deployment topology: a `[registry]`
//! table of identities and allowed targets, a `[pdp]` section, an
//! `[orchestrator]` section, and per-domain `[agents.<domain>]` /
//! `[gateways.<domain>]` sections. `WaypointConfig::load` applies input
//! guards (size, encoding) before parsing and validates the result before
//! returning it.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;
use url::Url;
use waypoint_core::Domain;
use waypoint_core::Identity;
use waypoint_core::PolicyRegistry;
use waypoint_core::RegistryEntry;
use waypoint_core::Role;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Maximum accepted config file size in bytes.
pub const MAX_CONFIG_BYTES: usize = 1_048_576;

/// Default PDP decision timeout in milliseconds.
pub const DEFAULT_DECIDE_TIMEOUT_MS: u64 = 2_000;

/// Default intra-system request timeout in milliseconds.
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 5_000;

/// Default gateway session time-to-live in seconds.
pub const DEFAULT_SESSION_TTL_SECS: u64 = 900;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration loading and validation errors.
///
/// # Invariants
/// - Variants are stable for programmatic handling and tests.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file could not be read.
    #[error("config file read failed: {0}")]
    Io(String),
    /// Config file exceeds the accepted size limit.
    #[error("config file exceeds size limit ({actual} > {limit})")]
    TooLarge {
        /// Actual file size in bytes.
        actual: usize,
        /// Maximum accepted size in bytes.
        limit: usize,
    },
    /// Config file is not valid UTF-8.
    #[error("config file must be utf-8")]
    NotUtf8,
    /// TOML parsing failed.
    #[error("config parse failed: {0}")]
    Parse(String),
    /// A registry identity or component identity is empty.
    #[error("empty identity in section: {0}")]
    EmptyIdentity(String),
    /// A component references an identity missing from the registry.
    #[error("identity not registered: {0}")]
    UnregisteredIdentity(String),
    /// A domain key is not one of flights, lodging, vehicles.
    #[error("unknown domain key: {0}")]
    UnknownDomain(String),
    /// An agent domain has no matching gateway section (or vice versa).
    #[error("domain wiring incomplete: {0}")]
    IncompleteDomain(String),
    /// An endpoint failed to parse as an absolute URL.
    #[error("invalid endpoint for {section}: {reason}")]
    InvalidEndpoint {
        /// Section containing the endpoint.
        section: String,
        /// Parse failure description.
        reason: String,
    },
    /// A timeout or TTL is zero.
    #[error("zero duration for {0}")]
    ZeroDuration(String),
}

// ============================================================================
// SECTION: Section Models
// ============================================================================

/// Registry entry as written in configuration.
///
/// # Invariants
/// - `allowed_targets` is the exhaustive whitelist for this identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryEntryConfig {
    /// Role label for this identity.
    pub role: Role,
    /// Identities this entry may call.
    #[serde(default)]
    pub allowed_targets: BTreeSet<String>,
}

/// Policy decision point wiring.
///
/// # Invariants
/// - `endpoint` is the decide URL base; `decide_timeout_ms` bounds each call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PdpConfig {
    /// PDP component identity.
    pub identity: String,
    /// Base endpoint for the decide operation.
    pub endpoint: String,
    /// Listen address when serving the PDP.
    pub listen: String,
    /// Per-decision timeout in milliseconds.
    #[serde(default = "default_decide_timeout_ms")]
    pub decide_timeout_ms: u64,
}

/// Orchestrator wiring.
///
/// # Invariants
/// - `context_endpoint` points at the external itinerary collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrchestratorConfig {
    /// Orchestrator component identity.
    pub identity: String,
    /// Listen address when serving the orchestrator.
    pub listen: String,
    /// Endpoint of the context collaborator.
    pub context_endpoint: String,
    /// Per-hop request timeout in milliseconds.
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
}

/// Worker agent wiring for one domain.
///
/// # Invariants
/// - `gateway_identity` must match the gateway section for the same domain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Agent component identity.
    pub identity: String,
    /// Agent endpoint as seen by the orchestrator.
    pub endpoint: String,
    /// Listen address when serving this agent.
    pub listen: String,
    /// Identity of this agent's tool gateway.
    pub gateway_identity: String,
    /// Endpoint of this agent's tool gateway.
    pub gateway_endpoint: String,
    /// Per-hop request timeout in milliseconds.
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
}

/// Tool gateway wiring for one domain.
///
/// # Invariants
/// - `backend_endpoint` points at the external record-of-truth service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Gateway component identity.
    pub identity: String,
    /// Listen address when serving this gateway.
    pub listen: String,
    /// Endpoint of the domain backend collaborator.
    pub backend_endpoint: String,
    /// Session time-to-live in seconds.
    #[serde(default = "default_session_ttl_secs")]
    pub session_ttl_secs: u64,
    /// Per-backend-call timeout in milliseconds.
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
}

// ============================================================================
// SECTION: Root Config
// ============================================================================

/// Root deployment configuration.
///
/// # Invariants
/// - Validated before use; see [`WaypointConfig::validate`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaypointConfig {
    /// Policy registry keyed by identity.
    #[serde(default)]
    pub registry: BTreeMap<String, RegistryEntryConfig>,
    /// Policy decision point wiring.
    pub pdp: PdpConfig,
    /// Orchestrator wiring.
    pub orchestrator: OrchestratorConfig,
    /// Agent wiring keyed by domain (flights, lodging, vehicles).
    #[serde(default)]
    pub agents: BTreeMap<String, AgentConfig>,
    /// Gateway wiring keyed by domain (flights, lodging, vehicles).
    #[serde(default)]
    pub gateways: BTreeMap<String, GatewayConfig>,
}

impl WaypointConfig {
    /// Loads and validates configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when reading, parsing, or validation fails.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let bytes = fs::read(path).map_err(|err| ConfigError::Io(err.to_string()))?;
        if bytes.len() > MAX_CONFIG_BYTES {
            return Err(ConfigError::TooLarge {
                actual: bytes.len(),
                limit: MAX_CONFIG_BYTES,
            });
        }
        let text = String::from_utf8(bytes).map_err(|_| ConfigError::NotUtf8)?;
        Self::from_toml(&text)
    }

    /// Parses and validates configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when parsing or validation fails.
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration fail-closed.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] on the first violated invariant.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (identity, entry) in &self.registry {
            if identity.trim().is_empty() {
                return Err(ConfigError::EmptyIdentity("registry".to_string()));
            }
            if entry.allowed_targets.iter().any(|target| target.trim().is_empty()) {
                return Err(ConfigError::EmptyIdentity(format!("registry.{identity}")));
            }
        }
        validate_endpoint("pdp", &self.pdp.endpoint)?;
        validate_endpoint("orchestrator.context", &self.orchestrator.context_endpoint)?;
        validate_duration("pdp.decide_timeout_ms", self.pdp.decide_timeout_ms)?;
        validate_duration(
            "orchestrator.request_timeout_ms",
            self.orchestrator.request_timeout_ms,
        )?;
        self.require_registered("orchestrator", &self.orchestrator.identity)?;
        for (domain, agent) in &self.agents {
            parse_domain(domain)?;
            validate_endpoint(&format!("agents.{domain}"), &agent.endpoint)?;
            validate_endpoint(&format!("agents.{domain}.gateway"), &agent.gateway_endpoint)?;
            validate_duration(
                &format!("agents.{domain}.request_timeout_ms"),
                agent.request_timeout_ms,
            )?;
            self.require_registered(&format!("agents.{domain}"), &agent.identity)?;
            let gateway = self
                .gateways
                .get(domain)
                .ok_or_else(|| ConfigError::IncompleteDomain(domain.clone()))?;
            if gateway.identity != agent.gateway_identity {
                return Err(ConfigError::IncompleteDomain(domain.clone()));
            }
        }
        for (domain, gateway) in &self.gateways {
            parse_domain(domain)?;
            validate_endpoint(&format!("gateways.{domain}.backend"), &gateway.backend_endpoint)?;
            validate_duration(
                &format!("gateways.{domain}.session_ttl_secs"),
                gateway.session_ttl_secs,
            )?;
            validate_duration(
                &format!("gateways.{domain}.request_timeout_ms"),
                gateway.request_timeout_ms,
            )?;
            if gateway.identity.trim().is_empty() {
                return Err(ConfigError::EmptyIdentity(format!("gateways.{domain}")));
            }
            if !self.agents.contains_key(domain) {
                return Err(ConfigError::IncompleteDomain(domain.clone()));
            }
        }
        Ok(())
    }

    /// Builds the immutable policy registry from configuration.
    #[must_use]
    pub fn policy_registry(&self) -> PolicyRegistry {
        let entries = self
            .registry
            .iter()
            .map(|(identity, entry)| {
                (
                    Identity::from(identity.as_str()),
                    RegistryEntry {
                        role: entry.role,
                        allowed_targets: entry
                            .allowed_targets
                            .iter()
                            .map(|target| Identity::from(target.as_str()))
                            .collect(),
                    },
                )
            })
            .collect();
        PolicyRegistry::new(entries)
    }

    /// Returns the PDP decision timeout as a duration.
    #[must_use]
    pub const fn decide_timeout(&self) -> Duration {
        Duration::from_millis(self.pdp.decide_timeout_ms)
    }

    /// Returns the agent config for a domain when wired.
    #[must_use]
    pub fn agent(&self, domain: Domain) -> Option<&AgentConfig> {
        self.agents.get(domain.as_str())
    }

    /// Returns the gateway config for a domain when wired.
    #[must_use]
    pub fn gateway(&self, domain: Domain) -> Option<&GatewayConfig> {
        self.gateways.get(domain.as_str())
    }

    /// Requires that the identity used by a section is registered.
    fn require_registered(&self, section: &str, identity: &str) -> Result<(), ConfigError> {
        if identity.trim().is_empty() {
            return Err(ConfigError::EmptyIdentity(section.to_string()));
        }
        if self.registry.contains_key(identity) {
            Ok(())
        } else {
            Err(ConfigError::UnregisteredIdentity(identity.to_string()))
        }
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Parses a domain key into the closed domain set.
fn parse_domain(key: &str) -> Result<Domain, ConfigError> {
    match key {
        "flights" => Ok(Domain::Flights),
        "lodging" => Ok(Domain::Lodging),
        "vehicles" => Ok(Domain::Vehicles),
        other => Err(ConfigError::UnknownDomain(other.to_string())),
    }
}

/// Validates an endpoint as an absolute URL.
fn validate_endpoint(section: &str, endpoint: &str) -> Result<(), ConfigError> {
    Url::parse(endpoint).map_err(|err| ConfigError::InvalidEndpoint {
        section: section.to_string(),
        reason: err.to_string(),
    })?;
    Ok(())
}

/// Validates a duration value as non-zero.
fn validate_duration(section: &str, value: u64) -> Result<(), ConfigError> {
    if value == 0 {
        return Err(ConfigError::ZeroDuration(section.to_string()));
    }
    Ok(())
}

/// Default for [`PdpConfig::decide_timeout_ms`].
const fn default_decide_timeout_ms() -> u64 {
    DEFAULT_DECIDE_TIMEOUT_MS
}

/// Default for request timeout fields.
const fn default_request_timeout_ms() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_MS
}

/// Default for [`GatewayConfig::session_ttl_secs`].
const fn default_session_ttl_secs() -> u64 {
    DEFAULT_SESSION_TTL_SECS
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests;
