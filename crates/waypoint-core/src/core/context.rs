// crates/waypoint-core/src/core/context.rs
// ============================================================================
// Module: Dispatch Context
// Description: Per-request snapshot of the caller's trip state.
// Purpose: Pass trip context by value so concurrent requests never interfere.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! The dispatch context is fetched once per inbound orchestrator request
//! from the context collaborator and passed by value down to the worker
//! agent. It is a snapshot: downstream mutation affects only the copy, and
//! concurrent requests each carry their own.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;
use serde_json::Map;
use serde_json::Value;

// ============================================================================
// SECTION: Trip Types
// ============================================================================

/// Summary of a trip owned by the caller.
///
/// # Invariants
/// - `trip_id` is assigned by the context collaborator and treated as opaque.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TripSummary {
    /// Opaque trip identifier.
    pub trip_id: String,
    /// Trip destination city.
    pub destination: String,
    /// Human-readable trip name.
    pub name: String,
    /// Trip status label (planning, confirmed, ...).
    pub status: String,
}

/// One booked or pending item on a trip's itinerary.
///
/// # Invariants
/// - Items are append-only; existing items are never rewritten in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItineraryItem {
    /// Item kind label (flight, hotel, vehicle).
    pub item_type: String,
    /// Item status label (pending, confirmed, cancelled).
    pub status: String,
    /// Booking confirmation reference when confirmed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub booking_reference: Option<String>,
    /// Provider-specific details payload.
    #[serde(default)]
    pub details: Value,
}

// ============================================================================
// SECTION: Dispatch Context
// ============================================================================

/// Snapshot of the caller's state passed down to a worker agent.
///
/// # Invariants
/// - Passed by value; never shared mutably across concurrent requests.
/// - `confirmed` is set only from the inbound request's explicit
///   confirmation field, never from message text.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DispatchContext {
    /// The caller's active trip, when one exists.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_trip: Option<TripSummary>,
    /// Prior itinerary items on the active trip.
    #[serde(default)]
    pub itinerary: Vec<ItineraryItem>,
    /// User preference key/value pairs.
    #[serde(default)]
    pub preferences: Map<String, Value>,
    /// Explicit affirmative confirmation signal for side-effecting tools.
    #[serde(default)]
    pub confirmed: bool,
}

impl DispatchContext {
    /// Returns the active trip's destination when present.
    #[must_use]
    pub fn destination(&self) -> Option<&str> {
        self.active_trip.as_ref().map(|trip| trip.destination.as_str())
    }

    /// Returns a string preference by key when present.
    #[must_use]
    pub fn preference(&self, key: &str) -> Option<&str> {
        self.preferences.get(key).and_then(Value::as_str)
    }
}
