// crates/waypoint-agent/src/rules/tests.rs
// ============================================================================
// Module: Dispatch Rule Tests
// Description: Unit tests for rule priority and argument extraction.
// Purpose: Verify first-match-wins ordering and context-first extraction.
// ============================================================================

//! Unit tests for the ordered dispatch tables.

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "Test-only assertions and helpers are permitted."
)]

use waypoint_core::DispatchContext;
use waypoint_core::Domain;
use waypoint_core::TripSummary;

use super::match_rule;
use super::rules;

fn context_with_destination(destination: &str) -> DispatchContext {
    DispatchContext {
        active_trip: Some(TripSummary {
            trip_id: "trip-1".to_string(),
            destination: destination.to_string(),
            name: format!("Trip to {destination}"),
            status: "planning".to_string(),
        }),
        ..DispatchContext::default()
    }
}

#[test]
fn cancellation_outranks_booking_for_cancel_messages() {
    // "cancel my booking" contains both "cancel" and "book".
    let rule = match_rule(Domain::Flights, "Cancel my booking BK-000001").expect("rule");
    assert_eq!(rule.tool, "cancel_booking");
    assert!(rule.side_effecting);
}

#[test]
fn status_lookup_outranks_booking_for_check_messages() {
    let rule = match_rule(Domain::Lodging, "Check the status of my booking").expect("rule");
    assert_eq!(rule.tool, "get_reservation");
    assert!(!rule.side_effecting);
}

#[test]
fn booking_messages_select_the_booking_tool() {
    let rule = match_rule(Domain::Vehicles, "Please book a car for me").expect("rule");
    assert_eq!(rule.tool, "book_vehicle");
    assert!(rule.side_effecting);
}

#[test]
fn generic_search_is_the_lowest_priority_match() {
    let rule = match_rule(Domain::Flights, "find me a flight").expect("rule");
    assert_eq!(rule.tool, "search_flights");
}

#[test]
fn unmatched_messages_select_no_rule() {
    assert!(match_rule(Domain::Flights, "what is the weather like").is_none());
    assert!(match_rule(Domain::None, "book everything").is_none());
}

#[test]
fn search_extraction_prefers_the_context_destination() {
    let rule = match_rule(Domain::Lodging, "search hotels").expect("rule");
    let context = context_with_destination("Paris");
    let args = (rule.extract)("search hotels", &context);
    assert_eq!(args["city"], "Paris");
}

#[test]
fn search_extraction_reads_a_city_from_the_message_without_context() {
    let rule = match_rule(Domain::Lodging, "Find hotels in Miami").expect("rule");
    assert_eq!(rule.tool, "search_hotels");
    let args = (rule.extract)("Find hotels in Miami", &DispatchContext::default());
    assert_eq!(args["city"], "Miami");
}

#[test]
fn search_extraction_defaults_without_context() {
    let rule = match_rule(Domain::Lodging, "search hotels").expect("rule");
    let args = (rule.extract)("search hotels", &DispatchContext::default());
    assert_eq!(args["city"], "anywhere");
}

#[test]
fn reference_extraction_finds_the_booking_token() {
    let rule = match_rule(Domain::Flights, "cancel it").expect("rule");
    let args = (rule.extract)("cancel BK-000042, please", &DispatchContext::default());
    assert_eq!(args["reference"], "BK-000042");
}

#[test]
fn reference_extraction_tolerates_a_missing_token() {
    let rule = match_rule(Domain::Flights, "cancel it").expect("rule");
    let args = (rule.extract)("cancel it", &DispatchContext::default());
    assert_eq!(args["reference"], "");
}

#[test]
fn every_dispatchable_domain_has_a_five_rule_table() {
    for domain in [Domain::Flights, Domain::Lodging, Domain::Vehicles] {
        assert_eq!(rules(domain).len(), 5, "{domain:?} table size");
    }
}
