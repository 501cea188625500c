// crates/waypoint-orchestrator/src/orchestrator/tests.rs
// ============================================================================
// Module: Orchestrator Core Tests
// Description: Pipeline tests for locally handled intents and formatting.
// Purpose: Verify query answering, trip creation, and dispatch guards.
// ============================================================================

//! Unit tests for the orchestrator pipeline without live agents.

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "Test-only assertions and helpers are permitted."
)]

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use waypoint_core::DispatchContext;
use waypoint_core::Domain;
use waypoint_core::Identity;
use waypoint_core::ItineraryItem;
use waypoint_core::TripSummary;

use super::ChatRequest;
use super::Orchestrator;
use super::format_itinerary;
use crate::context_store::ContextStore;
use crate::context_store::InMemoryContextStore;
use crate::registry::AgentRegistry;

fn orchestrator_with(store: Arc<InMemoryContextStore>) -> Orchestrator {
    let mut registry = AgentRegistry::new();
    registry.register(
        Domain::Lodging,
        Identity::from("hotel-agent"),
        "http://127.0.0.1:1".to_string(),
    );
    Orchestrator::new(
        Identity::from("orchestrator"),
        store,
        registry,
        Duration::from_millis(250),
    )
    .expect("orchestrator")
}

fn chat(message: &str) -> ChatRequest {
    ChatRequest {
        message: message.to_string(),
        caller_id: "traveler-1".to_string(),
        conversation_id: None,
        trip_id: None,
        confirmed: false,
    }
}

#[tokio::test]
async fn new_callers_get_an_empty_itinerary_answer() {
    let store = Arc::new(InMemoryContextStore::new());
    let orchestrator = orchestrator_with(Arc::clone(&store));
    let response = orchestrator.handle(chat("show me my itinerary")).await;
    assert!(response.success);
    assert!(response.message.contains("don't have any active trips"));
    assert_eq!(response.intent.as_deref(), Some("query_itinerary"));
    assert!(!response.context_used);
    assert!(response.tools_called.is_empty());
}

#[tokio::test]
async fn trip_creation_extracts_the_destination_and_persists() {
    let store = Arc::new(InMemoryContextStore::new());
    let orchestrator = orchestrator_with(Arc::clone(&store));
    let response = orchestrator.handle(chat("I'm planning a trip to Lisbon")).await;
    assert!(response.success);
    assert_eq!(response.intent.as_deref(), Some("create_trip"));
    let data = response.data.expect("trip payload");
    assert_eq!(data["destination"], "Lisbon");

    let context = store.get_context("traveler-1").await.expect("context");
    assert_eq!(context.destination(), Some("Lisbon"));
}

#[tokio::test]
async fn trip_creation_without_a_destination_asks_for_one() {
    let store = Arc::new(InMemoryContextStore::new());
    let orchestrator = orchestrator_with(store);
    let response = orchestrator.handle(chat("i want to go somewhere")).await;
    assert!(response.success);
    assert!(response.message.contains("destination"));
    assert!(response.data.is_none());
}

#[tokio::test]
async fn domainless_search_asks_which_domain() {
    let store = Arc::new(InMemoryContextStore::new());
    let orchestrator = orchestrator_with(store);
    let response = orchestrator.handle(chat("search for options")).await;
    assert!(response.success);
    assert!(response.domain_used.is_none());
    assert!(response.message.contains("flights, hotels, or rental vehicles"));
}

#[tokio::test]
async fn undiscovered_agents_fail_when_the_recovery_probe_misses() {
    let store = Arc::new(InMemoryContextStore::new());
    let orchestrator = orchestrator_with(store);
    // The lodging agent was registered but never marked healthy, and its
    // endpoint is a closed port, so the pre-dispatch probe fails too.
    let response = orchestrator.handle(chat("search hotels please")).await;
    assert!(!response.success);
    assert_eq!(response.error.as_deref(), Some("upstream_unavailable"));
    assert!(response.tools_called.is_empty());
}

#[tokio::test]
async fn unregistered_domains_fail_terminally() {
    let store = Arc::new(InMemoryContextStore::new());
    let orchestrator = orchestrator_with(store);
    let response = orchestrator.handle(chat("find me a flight")).await;
    assert!(!response.success);
    assert_eq!(response.error.as_deref(), Some("upstream_unavailable"));
}

#[tokio::test]
async fn general_messages_get_a_capability_answer() {
    let store = Arc::new(InMemoryContextStore::new());
    let orchestrator = orchestrator_with(store);
    let response = orchestrator.handle(chat("hello!")).await;
    assert!(response.success);
    assert_eq!(response.intent.as_deref(), Some("general"));
    assert!(response.agent_used.is_none());
}

#[test]
fn itinerary_formatting_lists_items_with_references() {
    let context = DispatchContext {
        active_trip: Some(TripSummary {
            trip_id: "trip-1".to_string(),
            destination: "Paris".to_string(),
            name: "Trip to Paris".to_string(),
            status: "planning".to_string(),
        }),
        itinerary: vec![
            ItineraryItem {
                item_type: "hotel".to_string(),
                status: "confirmed".to_string(),
                booking_reference: Some("BK-000001".to_string()),
                details: Value::Null,
            },
            ItineraryItem {
                item_type: "flight".to_string(),
                status: "pending".to_string(),
                booking_reference: None,
                details: Value::Null,
            },
        ],
        ..DispatchContext::default()
    };
    let text = format_itinerary(&context);
    assert!(text.contains("Trip to Paris"));
    assert!(text.contains("Destination: Paris"));
    assert!(text.contains("- hotel (confirmed), reference BK-000001"));
    assert!(text.contains("- flight (pending)"));
}

#[test]
fn itinerary_formatting_handles_an_empty_trip() {
    let context = DispatchContext {
        active_trip: Some(TripSummary {
            trip_id: "trip-1".to_string(),
            destination: "Rome".to_string(),
            name: "Trip to Rome".to_string(),
            status: "planning".to_string(),
        }),
        ..DispatchContext::default()
    };
    assert!(format_itinerary(&context).contains("No bookings yet."));
}
