// crates/waypoint-agent/src/agent.rs
// ============================================================================
// Module: Worker Agent Core
// Description: Message processing over the ordered rule table.
// Purpose: Apply dispatch rules, the confirmation gate, and tool invocation.
// Dependencies: serde_json, waypoint-core
// ============================================================================

//! ## Overview
//! `WorkerAgent::process` is the whole agent pipeline: match a rule, gate
//! side effects on explicit confirmation, extract arguments from the
//! context, invoke through the gateway client, and shape the structured
//! response. Every attempted invocation lands in `tools_called` whether or
//! not the tool itself succeeded.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde_json::json;
use waypoint_core::AgentRequest;
use waypoint_core::AgentResponse;
use waypoint_core::Domain;
use waypoint_core::ErrorKind;
use waypoint_core::Identity;
use waypoint_core::ToolResult;

use crate::fallback::FallbackClassifier;
use crate::gateway_client::GatewayClient;
use crate::rules::match_rule;
use crate::rules::rules;

// ============================================================================
// SECTION: Worker Agent
// ============================================================================

/// One domain's worker agent.
///
/// # Invariants
/// - The fallback classifier has no path to the gateway client.
pub struct WorkerAgent {
    /// The agent's own identity.
    pub identity: Identity,
    /// Travel domain this agent serves.
    pub domain: Domain,
    /// Client for the agent's own tool gateway.
    gateway: GatewayClient,
    /// Optional free-text fallback for unmatched messages.
    fallback: Option<Box<dyn FallbackClassifier>>,
}

impl WorkerAgent {
    /// Builds a worker agent.
    #[must_use]
    pub fn new(
        identity: Identity,
        domain: Domain,
        gateway: GatewayClient,
        fallback: Option<Box<dyn FallbackClassifier>>,
    ) -> Self {
        Self {
            identity,
            domain,
            gateway,
            fallback,
        }
    }

    /// Names of the tools this agent can invoke, in rule priority order.
    #[must_use]
    pub fn tool_names(&self) -> Vec<&'static str> {
        rules(self.domain).iter().map(|rule| rule.tool).collect()
    }

    /// Processes one dispatched message.
    pub async fn process(&self, request: AgentRequest) -> AgentResponse {
        let context = request.context.unwrap_or_default();
        let Some(rule) = match_rule(self.domain, &request.message) else {
            return self.unmatched(&request.message);
        };

        if rule.side_effecting && !context.confirmed {
            let mut response = AgentResponse::text(format!(
                "This will call {} and change your bookings. Reply with confirmation to proceed.",
                rule.tool
            ));
            response.data = Some(json!({ "requires_confirmation": true, "tool": rule.tool }));
            return response;
        }

        let arguments = (rule.extract)(&request.message, &context);
        let outcome = self.gateway.invoke(rule.tool, arguments).await;
        let mut response = match outcome {
            Ok(ToolResult::Ok {
                ok,
            }) => {
                let mut ok_response =
                    AgentResponse::text(format!("Completed {} for you.", rule.tool));
                ok_response.data = Some(ok);
                ok_response
            }
            Ok(ToolResult::Err {
                error,
            }) => AgentResponse::failure(
                format!("The {} tool reported an error.", rule.tool),
                error,
            ),
            Err(_) => AgentResponse::failure(
                "The tool gateway is currently unreachable.",
                ErrorKind::UpstreamUnavailable.as_str(),
            ),
        };
        response.tools_called.push(rule.tool.to_string());
        response
    }

    /// Answers a message no rule matched.
    fn unmatched(&self, message: &str) -> AgentResponse {
        if let Some(answer) = self.fallback.as_ref().and_then(|classifier| classifier.answer(message))
        {
            return AgentResponse::text(answer);
        }
        AgentResponse::text(format!(
            "I handle {} requests. Available tools: {}.",
            self.domain.as_str(),
            self.tool_names().join(", ")
        ))
    }
}
