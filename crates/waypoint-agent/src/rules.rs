// crates/waypoint-agent/src/rules.rs
// ============================================================================
// Module: Dispatch Rules
// Description: Ordered keyword rule tables per travel domain.
// Purpose: Map message text to a tool name and extracted arguments.
// Dependencies: serde_json, waypoint-core
// ============================================================================

//! ## Overview
//! Dispatch is a data-driven ordered table. Declaration order is priority
//! order: the first rule with a keyword contained in the lowercased message
//! wins. Extractors pull arguments from the dispatch context first (active
//! trip destination, preferences) and fall back to defaults; a missing
//! optional field never fails the request. Cancellation rules precede
//! booking rules because "booking" contains "book".

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde_json::Value;
use serde_json::json;
use waypoint_core::DispatchContext;
use waypoint_core::Domain;

// ============================================================================
// SECTION: Rule Type
// ============================================================================

/// One entry in a domain dispatch table.
///
/// # Invariants
/// - `keywords` are lowercase; matching lowercases the message.
/// - `side_effecting` rules require explicit confirmation before invocation.
pub struct DispatchRule {
    /// Keywords matched as substrings of the lowercased message.
    pub keywords: &'static [&'static str],
    /// Tool invoked when this rule wins.
    pub tool: &'static str,
    /// Whether the tool creates or destroys bookings.
    pub side_effecting: bool,
    /// Builds tool arguments from the message and context.
    pub extract: fn(&str, &DispatchContext) -> Value,
}

// ============================================================================
// SECTION: Argument Extractors
// ============================================================================

/// Finds a booking reference token (`BK-...`) in the message.
fn find_reference(message: &str) -> Option<&str> {
    message
        .split_whitespace()
        .find(|word| word.starts_with("BK-"))
        .map(|word| word.trim_end_matches(['.', ',', '!', '?']))
}

/// Cities recognized directly in message text.
const CITY_NAMES: &[&str] = &[
    "Miami",
    "New York",
    "Los Angeles",
    "Chicago",
    "San Francisco",
    "Seattle",
    "Boston",
    "Denver",
    "Atlanta",
    "Paris",
    "London",
    "Tokyo",
];

/// Finds a known city mentioned anywhere in the message.
fn city_in_message(message: &str) -> Option<&'static str> {
    let lowered = message.to_lowercase();
    CITY_NAMES.iter().copied().find(|city| lowered.contains(&city.to_lowercase()))
}

/// City from the trip context first, then the message, then a neutral default.
fn city_for<'a>(message: &str, context: &'a DispatchContext) -> &'a str {
    context
        .destination()
        .or_else(|| city_in_message(message))
        .unwrap_or("anywhere")
}

/// Arguments for read-only searches.
fn extract_search(message: &str, context: &DispatchContext) -> Value {
    json!({ "city": city_for(message, context) })
}

/// Arguments for booking creation; carries the raw request as notes.
fn extract_book(message: &str, context: &DispatchContext) -> Value {
    json!({ "city": city_for(message, context), "notes": message })
}

/// Arguments for reference lookups and cancellations.
fn extract_reference(message: &str, _context: &DispatchContext) -> Value {
    json!({ "reference": find_reference(message).unwrap_or("") })
}

/// Arguments for unfiltered listing tools.
fn extract_none(_message: &str, _context: &DispatchContext) -> Value {
    json!({})
}

// ============================================================================
// SECTION: Domain Tables
// ============================================================================

/// Flight domain dispatch table.
const FLIGHTS_RULES: &[DispatchRule] = &[
    DispatchRule {
        keywords: &["cancel"],
        tool: "cancel_booking",
        side_effecting: true,
        extract: extract_reference,
    },
    DispatchRule {
        keywords: &["status", "reference", "check"],
        tool: "get_booking",
        side_effecting: false,
        extract: extract_reference,
    },
    DispatchRule {
        keywords: &["book", "reserve"],
        tool: "book_flight",
        side_effecting: true,
        extract: extract_book,
    },
    DispatchRule {
        keywords: &["airport"],
        tool: "list_airports",
        side_effecting: false,
        extract: extract_none,
    },
    DispatchRule {
        keywords: &["search", "find", "flight", "fly"],
        tool: "search_flights",
        side_effecting: false,
        extract: extract_search,
    },
];

/// Lodging domain dispatch table.
const LODGING_RULES: &[DispatchRule] = &[
    DispatchRule {
        keywords: &["cancel"],
        tool: "cancel_reservation",
        side_effecting: true,
        extract: extract_reference,
    },
    DispatchRule {
        keywords: &["status", "reference", "check"],
        tool: "get_reservation",
        side_effecting: false,
        extract: extract_reference,
    },
    DispatchRule {
        keywords: &["book", "reserve"],
        tool: "book_hotel",
        side_effecting: true,
        extract: extract_book,
    },
    DispatchRule {
        keywords: &["cities", "city list"],
        tool: "list_cities",
        side_effecting: false,
        extract: extract_none,
    },
    DispatchRule {
        keywords: &["search", "find", "hotel", "stay", "room"],
        tool: "search_hotels",
        side_effecting: false,
        extract: extract_search,
    },
];

/// Vehicle domain dispatch table.
const VEHICLES_RULES: &[DispatchRule] = &[
    DispatchRule {
        keywords: &["cancel"],
        tool: "cancel_rental",
        side_effecting: true,
        extract: extract_reference,
    },
    DispatchRule {
        keywords: &["status", "reference", "check"],
        tool: "get_rental",
        side_effecting: false,
        extract: extract_reference,
    },
    DispatchRule {
        keywords: &["book", "reserve", "rent"],
        tool: "book_vehicle",
        side_effecting: true,
        extract: extract_book,
    },
    DispatchRule {
        keywords: &["location"],
        tool: "list_locations",
        side_effecting: false,
        extract: extract_none,
    },
    DispatchRule {
        keywords: &["search", "find", "car", "vehicle"],
        tool: "search_vehicles",
        side_effecting: false,
        extract: extract_search,
    },
];

/// Returns the ordered dispatch table for a domain.
#[must_use]
pub const fn rules(domain: Domain) -> &'static [DispatchRule] {
    match domain {
        Domain::Flights => FLIGHTS_RULES,
        Domain::Lodging => LODGING_RULES,
        Domain::Vehicles => VEHICLES_RULES,
        Domain::None => &[],
    }
}

/// Returns the first rule whose keywords match the message.
#[must_use]
pub fn match_rule(domain: Domain, message: &str) -> Option<&'static DispatchRule> {
    let lowered = message.to_lowercase();
    rules(domain)
        .iter()
        .find(|rule| rule.keywords.iter().any(|keyword| lowered.contains(keyword)))
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests;
