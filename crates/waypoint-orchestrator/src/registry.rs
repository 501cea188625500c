// crates/waypoint-orchestrator/src/registry.rs
// ============================================================================
// Module: Agent Registry
// Description: Orchestrator-owned registry of worker agents per domain.
// Purpose: Track agent endpoints, discovered tools, and health marks.
// Dependencies: serde, waypoint-core
// ============================================================================

//! ## Overview
//! The registry maps each dispatchable domain to one worker agent entry.
//! Health is mutated only through explicit mark operations on the
//! orchestrator-owned registry; nothing else writes to it. An entry starts
//! unhealthy and becomes dispatchable only after a successful discovery,
//! run at startup or as a recovery probe before a dispatch.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use serde::Serialize;
use waypoint_core::Domain;
use waypoint_core::Identity;

// ============================================================================
// SECTION: Registry Types
// ============================================================================

/// One registered worker agent.
///
/// # Invariants
/// - `healthy` flips only via [`AgentRegistry::mark_healthy`] and
///   [`AgentRegistry::mark_unhealthy`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AgentEntry {
    /// The agent's registered identity.
    pub identity: Identity,
    /// The agent's base endpoint.
    pub endpoint: String,
    /// Tool names discovered from the agent's catalog.
    pub tools: Vec<String>,
    /// Whether the agent is currently dispatchable.
    pub healthy: bool,
}

/// Registry of worker agents keyed by domain.
#[derive(Debug, Default)]
pub struct AgentRegistry {
    /// Registered agents.
    entries: BTreeMap<Domain, AgentEntry>,
}

impl AgentRegistry {
    /// Builds an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an agent for a domain, initially unhealthy.
    pub fn register(&mut self, domain: Domain, identity: Identity, endpoint: String) {
        self.entries.insert(
            domain,
            AgentEntry {
                identity,
                endpoint,
                tools: Vec::new(),
                healthy: false,
            },
        );
    }

    /// Returns the entry for a domain.
    #[must_use]
    pub fn entry(&self, domain: Domain) -> Option<&AgentEntry> {
        self.entries.get(&domain)
    }

    /// Marks a domain's agent healthy with its discovered tools.
    pub fn mark_healthy(&mut self, domain: Domain, tools: Vec<String>) {
        if let Some(entry) = self.entries.get_mut(&domain) {
            entry.tools = tools;
            entry.healthy = true;
        }
    }

    /// Marks a domain's agent unhealthy.
    pub fn mark_unhealthy(&mut self, domain: Domain) {
        if let Some(entry) = self.entries.get_mut(&domain) {
            entry.healthy = false;
        }
    }

    /// Returns a serializable snapshot of all entries.
    #[must_use]
    pub fn snapshot(&self) -> BTreeMap<&'static str, AgentEntry> {
        self.entries.iter().map(|(domain, entry)| (domain.as_str(), entry.clone())).collect()
    }

    /// Returns the registered domains.
    #[must_use]
    pub fn domains(&self) -> Vec<Domain> {
        self.entries.keys().copied().collect()
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
