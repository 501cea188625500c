// crates/waypoint-enforce/src/decision.rs
// ============================================================================
// Module: Decision Clients
// Description: DecisionPoint trait plus HTTP and in-process implementations.
// Purpose: Obtain authorization decisions with a bounded timeout.
// Dependencies: async-trait, reqwest, thiserror, waypoint-core
// ============================================================================

//! ## Overview
//! A [`DecisionPoint`] answers one question: may this caller reach this
//! target on this path. The HTTP implementation talks to the PDP service
//! with a short timeout; the static implementation evaluates an in-process
//! registry and exists for local wiring and tests. Transport failures
//! surface as [`DecisionPointError::Unavailable`], never as a decision.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use thiserror::Error;
use waypoint_core::AuthorizationRequest;
use waypoint_core::Decision;
use waypoint_core::PolicyRegistry;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Decision client failures.
///
/// # Invariants
/// - An error is never a decision; callers must treat it as unavailable.
#[derive(Debug, Error)]
pub enum DecisionPointError {
    /// The decision point could not be reached or answered malformed data.
    #[error("decision point unavailable: {0}")]
    Unavailable(String),
}

// ============================================================================
// SECTION: Trait
// ============================================================================

/// Source of authorization decisions.
#[async_trait]
pub trait DecisionPoint: Send + Sync {
    /// Evaluates one authorization request.
    ///
    /// # Errors
    ///
    /// Returns [`DecisionPointError`] when no decision could be obtained.
    async fn decide(&self, request: &AuthorizationRequest)
    -> Result<Decision, DecisionPointError>;
}

// ============================================================================
// SECTION: HTTP Implementation
// ============================================================================

/// HTTP client for the PDP decide endpoint.
///
/// # Invariants
/// - Base URL is normalized without a trailing slash.
/// - Every request carries the configured timeout.
pub struct HttpDecisionPoint {
    /// PDP base URL (no trailing slash).
    base_url: String,
    /// HTTP client configured with timeouts.
    client: Client,
}

impl HttpDecisionPoint {
    /// Builds a new HTTP decision point.
    ///
    /// # Errors
    ///
    /// Returns [`DecisionPointError`] when the HTTP client cannot be built.
    pub fn new(mut base_url: String, timeout: Duration) -> Result<Self, DecisionPointError> {
        let client = Client::builder()
            .connect_timeout(timeout)
            .timeout(timeout)
            .build()
            .map_err(|err| DecisionPointError::Unavailable(err.to_string()))?;
        let trimmed_len = base_url.trim_end_matches('/').len();
        base_url.truncate(trimmed_len);
        Ok(Self {
            base_url,
            client,
        })
    }
}

#[async_trait]
impl DecisionPoint for HttpDecisionPoint {
    async fn decide(
        &self,
        request: &AuthorizationRequest,
    ) -> Result<Decision, DecisionPointError> {
        let url = format!("{}/v1/decide", self.base_url);
        let response = self
            .client
            .post(url)
            .json(request)
            .send()
            .await
            .map_err(|err| DecisionPointError::Unavailable(err.to_string()))?;
        if !response.status().is_success() {
            return Err(DecisionPointError::Unavailable(format!(
                "decide returned status {}",
                response.status()
            )));
        }
        response
            .json::<Decision>()
            .await
            .map_err(|err| DecisionPointError::Unavailable(err.to_string()))
    }
}

// ============================================================================
// SECTION: In-Process Implementation
// ============================================================================

/// Decision point evaluating an in-process registry.
///
/// # Invariants
/// - Never fails; the registry is always reachable.
pub struct StaticDecisionPoint {
    /// Immutable policy registry.
    registry: PolicyRegistry,
}

impl StaticDecisionPoint {
    /// Builds a static decision point over a registry.
    #[must_use]
    pub const fn new(registry: PolicyRegistry) -> Self {
        Self {
            registry,
        }
    }
}

#[async_trait]
impl DecisionPoint for StaticDecisionPoint {
    async fn decide(
        &self,
        request: &AuthorizationRequest,
    ) -> Result<Decision, DecisionPointError> {
        Ok(self.registry.decide(request))
    }
}
