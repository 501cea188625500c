// crates/waypoint-core/src/core/intent.rs
// ============================================================================
// Module: Intent Model
// Description: Classified intent derived from an inbound message.
// Purpose: Route a single request; intents are never persisted.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! An intent is the `{kind, domain}` classification the orchestrator derives
//! from one inbound natural-language message, used only to route that
//! request. Confidence is advisory; routing itself is rule-ordered and
//! deterministic.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Intent Types
// ============================================================================

/// Action classification for an inbound message.
///
/// # Invariants
/// - Variants are stable for response metadata and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntentKind {
    /// Question about existing bookings; answered from context, no dispatch.
    QueryItinerary,
    /// Start planning a new trip; handled by the context collaborator.
    CreateTrip,
    /// Book something into the active trip.
    AddToTrip,
    /// Change an existing booking.
    ModifyBooking,
    /// Cancel an existing booking.
    CancelBooking,
    /// Search without booking intent.
    Search,
    /// No actionable travel intent; answered with a capability response.
    General,
}

impl IntentKind {
    /// Returns a stable label for the intent kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::QueryItinerary => "query_itinerary",
            Self::CreateTrip => "create_trip",
            Self::AddToTrip => "add_to_trip",
            Self::ModifyBooking => "modify_booking",
            Self::CancelBooking => "cancel_booking",
            Self::Search => "search",
            Self::General => "general",
        }
    }
}

/// Travel domain a message concerns.
///
/// # Invariants
/// - Variants are stable for agent registry keys and response metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Domain {
    /// Flight search and booking.
    Flights,
    /// Hotel search and booking.
    Lodging,
    /// Rental vehicle search and booking.
    Vehicles,
    /// No specific domain.
    None,
}

impl Domain {
    /// Returns a stable label for the domain.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Flights => "flights",
            Self::Lodging => "lodging",
            Self::Vehicles => "vehicles",
            Self::None => "none",
        }
    }

    /// Returns the dispatchable domains in classification order.
    #[must_use]
    pub const fn dispatchable() -> &'static [Self] {
        &[Self::Flights, Self::Lodging, Self::Vehicles]
    }
}

/// Classified intent for one inbound message.
///
/// # Invariants
/// - Derived per message; never persisted; used only to route that request.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Intent {
    /// Action classification.
    pub kind: IntentKind,
    /// Travel domain.
    pub domain: Domain,
    /// Advisory confidence in `[0.0, 1.0]`.
    pub confidence: f64,
}
