// crates/waypoint-agent/src/gateway_client.rs
// ============================================================================
// Module: Gateway Client
// Description: HTTP client for the agent's tool gateway.
// Purpose: Invoke tools with transparent sessions and a bounded retry.
// Dependencies: reqwest, waypoint-core
// ============================================================================

//! ## Overview
//! The client holds at most one gateway session. The first invocation sends
//! no session id and adopts whatever the gateway mints; later invocations
//! echo the stored id. When the gateway reports `session_expired` the
//! client adopts the fresh id from the same response and retries exactly
//! once. Transport failures are surfaced unretried.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Mutex;
use std::time::Duration;

use reqwest::Client;
use serde_json::Value;
use thiserror::Error;
use waypoint_core::ERR_SESSION_EXPIRED;
use waypoint_core::HEADER_CALLER;
use waypoint_core::Identity;
use waypoint_core::InvokeRequest;
use waypoint_core::InvokeResponse;
use waypoint_core::SessionId;
use waypoint_core::ToolResult;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Gateway client failures.
///
/// # Invariants
/// - Tool-level errors are not client failures; they ride in [`ToolResult`].
#[derive(Debug, Error)]
pub enum GatewayClientError {
    /// The gateway was unreachable or answered malformed data.
    #[error("gateway unavailable: {0}")]
    Unavailable(String),
    /// The gateway rejected the call at the transport level.
    #[error("gateway rejected call: status {0}")]
    Rejected(u16),
}

// ============================================================================
// SECTION: Client
// ============================================================================

/// HTTP client for one tool gateway.
///
/// # Invariants
/// - The session mutex is held only across the id swap, never across I/O.
pub struct GatewayClient {
    /// Agent identity asserted on every call.
    identity: Identity,
    /// Gateway base URL (no trailing slash).
    base_url: String,
    /// HTTP client configured with timeouts.
    client: Client,
    /// Session adopted from the gateway, when one is held.
    session: Mutex<Option<SessionId>>,
}

impl GatewayClient {
    /// Builds a new gateway client.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayClientError`] when the HTTP client cannot be built.
    pub fn new(
        identity: Identity,
        mut base_url: String,
        timeout: Duration,
    ) -> Result<Self, GatewayClientError> {
        let client = Client::builder()
            .connect_timeout(timeout)
            .timeout(timeout)
            .build()
            .map_err(|err| GatewayClientError::Unavailable(err.to_string()))?;
        let trimmed_len = base_url.trim_end_matches('/').len();
        base_url.truncate(trimmed_len);
        Ok(Self {
            identity,
            base_url,
            client,
            session: Mutex::new(None),
        })
    }

    /// Invokes one tool, establishing or refreshing the session as needed.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayClientError`] on transport failure. Tool-level
    /// errors are returned inside the `Ok` result.
    pub async fn invoke(
        &self,
        tool_name: &str,
        arguments: Value,
    ) -> Result<ToolResult, GatewayClientError> {
        let held = self.session.lock().map_or(None, |guard| guard.as_ref().cloned());
        let response = self.post_rpc(held, tool_name, arguments.clone()).await?;
        self.store_session(response.session_id.clone());
        if response.result.error() != Some(ERR_SESSION_EXPIRED) {
            return Ok(response.result);
        }
        // The expiry response already carries the replacement session.
        let retried =
            self.post_rpc(Some(response.session_id), tool_name, arguments).await?;
        self.store_session(retried.session_id);
        Ok(retried.result)
    }

    /// Sends one RPC exchange.
    async fn post_rpc(
        &self,
        session_id: Option<SessionId>,
        tool_name: &str,
        arguments: Value,
    ) -> Result<InvokeResponse, GatewayClientError> {
        let response = self
            .client
            .post(format!("{}/rpc", self.base_url))
            .header(HEADER_CALLER, self.identity.as_str())
            .json(&InvokeRequest {
                session_id,
                tool_name: tool_name.to_string(),
                arguments,
            })
            .send()
            .await
            .map_err(|err| GatewayClientError::Unavailable(err.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            return Err(GatewayClientError::Rejected(status.as_u16()));
        }
        response
            .json::<InvokeResponse>()
            .await
            .map_err(|err| GatewayClientError::Unavailable(err.to_string()))
    }

    /// Stores the session id adopted from the gateway.
    fn store_session(&self, id: SessionId) {
        if let Ok(mut guard) = self.session.lock() {
            *guard = Some(id);
        }
    }
}
