// crates/waypoint-orchestrator/src/orchestrator.rs
// ============================================================================
// Module: Orchestrator Core
// Description: Per-request pipeline from chat message to response.
// Purpose: Fetch context, classify, dispatch, post-process, respond.
// Dependencies: reqwest, serde, serde_json, thiserror, waypoint-core
// ============================================================================

//! ## Overview
//! `Orchestrator::handle` runs the whole entry-point pipeline for one chat
//! request. Itinerary queries and trip creation are handled locally against
//! the context store; domain requests are dispatched to the matching worker
//! agent with identity metadata headers and a by-value context snapshot.
//! After a successful booking dispatch the confirmation is appended to the
//! itinerary best-effort.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt::Write as _;
use std::sync::Arc;
use std::sync::Mutex;
use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use waypoint_core::AgentRequest;
use waypoint_core::AgentResponse;
use waypoint_core::DispatchContext;
use waypoint_core::Domain;
use waypoint_core::ErrorKind;
use waypoint_core::HEADER_CALLER;
use waypoint_core::HEADER_ORCHESTRATOR;
use waypoint_core::HEADER_TARGET;
use waypoint_core::Identity;
use waypoint_core::Intent;
use waypoint_core::IntentKind;
use waypoint_core::ItineraryItem;

use crate::classify::classify;
use crate::classify::extract_destination;
use crate::context_store::ContextStore;
use crate::registry::AgentRegistry;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Orchestrator construction failures.
#[derive(Debug, Error)]
pub enum OrchestratorError {
    /// The outbound HTTP client could not be built.
    #[error("http client build failed: {0}")]
    ClientBuild(String),
}

// ============================================================================
// SECTION: Wire Types
// ============================================================================

/// Inbound chat request.
///
/// # Invariants
/// - `confirmed` is the only source of the confirmation signal; message
///   text never sets it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    /// Natural-language message.
    pub message: String,
    /// Asserted end-caller identity.
    pub caller_id: String,
    /// Optional conversation identifier echoed back to the caller.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conversation_id: Option<String>,
    /// Optional explicit trip to operate on.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trip_id: Option<String>,
    /// Explicit affirmative confirmation for side-effecting operations.
    #[serde(default)]
    pub confirmed: bool,
}

/// Outbound chat response.
///
/// # Invariants
/// - `tools_called` aggregates every tool the dispatched agent attempted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatResponse {
    /// Whether the request was handled.
    pub success: bool,
    /// Human-readable response text.
    pub message: String,
    /// Structured payload, when one exists.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    /// Classified intent label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intent: Option<String>,
    /// Domain the request was dispatched to, when it was.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain_used: Option<String>,
    /// Identity of the agent that handled the request, when one did.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent_used: Option<String>,
    /// Tools the dispatched agent attempted.
    #[serde(default)]
    pub tools_called: Vec<String>,
    /// Whether stored caller context informed the handling.
    pub context_used: bool,
    /// Stable error label when `success` is false.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ChatResponse {
    /// Creates a successful local response with no dispatch.
    fn local(message: impl Into<String>, intent: Intent, context_used: bool) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: None,
            intent: Some(intent.kind.as_str().to_string()),
            domain_used: None,
            agent_used: None,
            tools_called: Vec::new(),
            context_used,
            error: None,
        }
    }

    /// Creates a failed response with a stable error label.
    fn failed(
        message: impl Into<String>,
        intent: Intent,
        error: ErrorKind,
        context_used: bool,
    ) -> Self {
        Self {
            success: false,
            message: message.into(),
            data: None,
            intent: Some(intent.kind.as_str().to_string()),
            domain_used: None,
            agent_used: None,
            tools_called: Vec::new(),
            context_used,
            error: Some(error.as_str().to_string()),
        }
    }
}

// ============================================================================
// SECTION: Orchestrator
// ============================================================================

/// The entry-point pipeline coordinator.
///
/// # Invariants
/// - The registry mutex is held only across registry operations, never
///   across dispatch I/O.
pub struct Orchestrator {
    /// The orchestrator's own identity.
    pub identity: Identity,
    /// Context collaborator.
    context_store: Arc<dyn ContextStore>,
    /// Worker agent registry; mutated only via mark operations.
    registry: Mutex<AgentRegistry>,
    /// Outbound HTTP client configured with timeouts.
    client: Client,
}

impl Orchestrator {
    /// Builds an orchestrator over a context store and agent registry.
    ///
    /// # Errors
    ///
    /// Returns [`OrchestratorError`] when the HTTP client cannot be built.
    pub fn new(
        identity: Identity,
        context_store: Arc<dyn ContextStore>,
        registry: AgentRegistry,
        request_timeout: Duration,
    ) -> Result<Self, OrchestratorError> {
        let client = Client::builder()
            .connect_timeout(request_timeout)
            .timeout(request_timeout)
            .build()
            .map_err(|err| OrchestratorError::ClientBuild(err.to_string()))?;
        Ok(Self {
            identity,
            context_store,
            registry: Mutex::new(registry),
            client,
        })
    }

    /// Refreshes agent health by fetching each agent's tool catalog.
    pub async fn discover(&self) {
        let targets: Vec<(Domain, String)> = {
            let Ok(guard) = self.registry.lock() else {
                return;
            };
            guard
                .domains()
                .into_iter()
                .filter_map(|domain| {
                    guard.entry(domain).map(|entry| (domain, entry.endpoint.clone()))
                })
                .collect()
        };
        for (domain, endpoint) in targets {
            let tools = self.fetch_tools(&endpoint).await;
            if let Ok(mut guard) = self.registry.lock() {
                match tools {
                    Some(tools) => guard.mark_healthy(domain, tools),
                    None => guard.mark_unhealthy(domain),
                }
            }
        }
    }

    /// Returns a serializable snapshot of the agent registry.
    #[must_use]
    pub fn registry_snapshot(&self) -> Value {
        self.registry
            .lock()
            .map_or_else(|_| Value::Null, |guard| {
                serde_json::to_value(guard.snapshot()).unwrap_or(Value::Null)
            })
    }

    /// Handles one chat request end to end.
    pub async fn handle(&self, request: ChatRequest) -> ChatResponse {
        // An unreachable context store degrades to an empty context; the
        // request still gets classified and answered.
        let mut context = self
            .context_store
            .get_context(&request.caller_id)
            .await
            .unwrap_or_default();
        let context_used = context.active_trip.is_some() || !context.itinerary.is_empty();
        context.confirmed = request.confirmed;

        let intent = classify(&request.message, &context);
        match intent.kind {
            IntentKind::QueryItinerary => {
                ChatResponse::local(format_itinerary(&context), intent, context_used)
            }
            IntentKind::CreateTrip => {
                self.create_trip(&request, intent, context_used).await
            }
            IntentKind::General => ChatResponse::local(
                "I can plan trips and search or book flights, hotels, and rental \
                 vehicles. Tell me where you want to go.",
                intent,
                context_used,
            ),
            IntentKind::AddToTrip
            | IntentKind::ModifyBooking
            | IntentKind::CancelBooking
            | IntentKind::Search => {
                if intent.domain == Domain::None {
                    return ChatResponse::local(
                        "Should I look at flights, hotels, or rental vehicles?",
                        intent,
                        context_used,
                    );
                }
                self.dispatch(&request, context, intent, context_used).await
            }
        }
    }

    /// Handles trip creation against the context store.
    async fn create_trip(
        &self,
        request: &ChatRequest,
        intent: Intent,
        context_used: bool,
    ) -> ChatResponse {
        let Some(destination) = extract_destination(&request.message) else {
            return ChatResponse::local(
                "Where would you like to go? Name a destination and I'll set up the trip.",
                intent,
                context_used,
            );
        };
        match self.context_store.create_trip(&request.caller_id, &destination).await {
            Ok(trip) => {
                let mut response = ChatResponse::local(
                    format!(
                        "Your trip to {destination} is set up. You can now search and \
                         book flights, hotels, and rental vehicles for it."
                    ),
                    intent,
                    context_used,
                );
                response.data = serde_json::to_value(&trip).ok();
                response
            }
            Err(_) => ChatResponse::failed(
                "I couldn't save the new trip. Please try again shortly.",
                intent,
                ErrorKind::UpstreamUnavailable,
                context_used,
            ),
        }
    }

    /// Dispatches the request to the matching worker agent.
    async fn dispatch(
        &self,
        request: &ChatRequest,
        context: DispatchContext,
        intent: Intent,
        context_used: bool,
    ) -> ChatResponse {
        let target = {
            let Ok(guard) = self.registry.lock() else {
                return ChatResponse::failed(
                    "Agent registry is unavailable.",
                    intent,
                    ErrorKind::UpstreamUnavailable,
                    context_used,
                );
            };
            match guard.entry(intent.domain) {
                None => {
                    return ChatResponse::failed(
                        format!("No agent is registered for {}.", intent.domain.as_str()),
                        intent,
                        ErrorKind::UpstreamUnavailable,
                        context_used,
                    );
                }
                Some(entry) => (entry.identity.clone(), entry.endpoint.clone(), entry.healthy),
            }
        };
        let (agent_identity, endpoint, healthy) = target;

        // A marked-down agent gets one rediscovery probe before the
        // dispatch is refused, so a recovered agent becomes reachable
        // again without a restart.
        if !healthy {
            match self.fetch_tools(&endpoint).await {
                Some(tools) => {
                    if let Ok(mut guard) = self.registry.lock() {
                        guard.mark_healthy(intent.domain, tools);
                    }
                }
                None => {
                    return ChatResponse::failed(
                        format!(
                            "The {} agent is currently unavailable.",
                            intent.domain.as_str()
                        ),
                        intent,
                        ErrorKind::UpstreamUnavailable,
                        context_used,
                    );
                }
            }
        }

        let agent_response = self
            .invoke_agent(&endpoint, &agent_identity, &request.message, context.clone())
            .await;
        let agent_response = match agent_response {
            Some(response) => response,
            None => {
                if let Ok(mut guard) = self.registry.lock() {
                    guard.mark_unhealthy(intent.domain);
                }
                return ChatResponse::failed(
                    format!("The {} agent did not respond.", intent.domain.as_str()),
                    intent,
                    ErrorKind::UpstreamUnavailable,
                    context_used,
                );
            }
        };

        let data = self
            .post_process(&request.caller_id, &context, intent, &agent_response)
            .await;
        ChatResponse {
            success: agent_response.success,
            message: agent_response.message,
            data,
            intent: Some(intent.kind.as_str().to_string()),
            domain_used: Some(intent.domain.as_str().to_string()),
            agent_used: Some(agent_identity.as_str().to_string()),
            tools_called: agent_response.tools_called,
            context_used,
            error: agent_response.error,
        }
    }

    /// Sends one dispatch to an agent's invoke operation.
    ///
    /// Returns `None` on transport failure or a non-success status; the
    /// caller treats both as an unavailable agent.
    async fn invoke_agent(
        &self,
        endpoint: &str,
        agent_identity: &Identity,
        message: &str,
        context: DispatchContext,
    ) -> Option<AgentResponse> {
        let base = endpoint.trim_end_matches('/');
        let response = self
            .client
            .post(format!("{base}/invoke"))
            .header(HEADER_CALLER, self.identity.as_str())
            .header(HEADER_ORCHESTRATOR, self.identity.as_str())
            .header(HEADER_TARGET, agent_identity.as_str())
            .json(&AgentRequest {
                message: message.to_string(),
                context: Some(context),
            })
            .send()
            .await
            .ok()?;
        if !response.status().is_success() {
            return None;
        }
        response.json::<AgentResponse>().await.ok()
    }

    /// Fetches an agent's tool catalog for discovery.
    ///
    /// Returns `None` on transport failure or a malformed catalog; the
    /// caller marks the agent unhealthy.
    async fn fetch_tools(&self, endpoint: &str) -> Option<Vec<String>> {
        let base = endpoint.trim_end_matches('/');
        let response = self.client.get(format!("{base}/tools")).send().await.ok()?;
        if !response.status().is_success() {
            return None;
        }
        let body = response.json::<Value>().await.ok()?;
        Some(
            body.get("tools")?
                .as_array()?
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect(),
        )
    }

    /// Appends a booking confirmation to the itinerary, best-effort.
    async fn post_process(
        &self,
        caller_id: &str,
        context: &DispatchContext,
        intent: Intent,
        agent_response: &AgentResponse,
    ) -> Option<Value> {
        let mut data = agent_response.data.clone();
        if intent.kind != IntentKind::AddToTrip || !agent_response.success {
            return data;
        }
        let reference = data
            .as_ref()
            .and_then(|value| value.get("reference"))
            .and_then(Value::as_str)
            .map(str::to_string);
        let Some(reference) = reference else {
            return data;
        };
        let Some(trip_id) = context.active_trip.as_ref().map(|trip| trip.trip_id.clone()) else {
            return data;
        };
        let item = ItineraryItem {
            item_type: item_type_for(intent.domain).to_string(),
            status: "confirmed".to_string(),
            booking_reference: Some(reference),
            details: data.clone().unwrap_or(Value::Null),
        };
        let appended = self
            .context_store
            .append_itinerary_item(caller_id, &trip_id, item)
            .await;
        if let Some(Value::Object(map)) = data.as_mut() {
            let status = if appended.is_ok() { "recorded" } else { "failed" };
            map.insert("itinerary_append".to_string(), Value::String(status.to_string()));
        }
        data
    }
}

// ============================================================================
// SECTION: Formatting
// ============================================================================

/// Maps a domain to its itinerary item type label.
const fn item_type_for(domain: Domain) -> &'static str {
    match domain {
        Domain::Flights => "flight",
        Domain::Lodging => "hotel",
        Domain::Vehicles => "vehicle",
        Domain::None => "item",
    }
}

/// Formats the caller's itinerary as readable text.
#[must_use]
pub fn format_itinerary(context: &DispatchContext) -> String {
    let Some(trip) = &context.active_trip else {
        return "You don't have any active trips. Would you like me to help you plan one?"
            .to_string();
    };
    let mut text = format!("{}\nDestination: {}\nStatus: {}\n", trip.name, trip.destination, trip.status);
    if context.itinerary.is_empty() {
        text.push_str("No bookings yet.");
        return text;
    }
    for item in &context.itinerary {
        let _ = match &item.booking_reference {
            Some(reference) => {
                writeln!(text, "- {} ({}), reference {reference}", item.item_type, item.status)
            }
            None => writeln!(text, "- {} ({})", item.item_type, item.status),
        };
    }
    text.trim_end().to_string()
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests;
