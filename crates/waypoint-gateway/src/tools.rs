// crates/waypoint-gateway/src/tools.rs
// ============================================================================
// Module: Tool Tables
// Description: Fixed per-domain tool catalogs.
// Purpose: Map tool names to backend operations for one travel domain.
// Dependencies: waypoint-core
// ============================================================================

//! ## Overview
//! Each travel domain serves a fixed five-tool table. The tables are data,
//! not code: a tool entry names the wire-visible tool, the backend
//! operation it maps to, and a human-readable description for the
//! discovery catalog. Listing tools are read-only searches with no
//! caller-supplied filter.

// ============================================================================
// SECTION: Imports
// ============================================================================

use waypoint_core::Domain;

// ============================================================================
// SECTION: Tool Specs
// ============================================================================

/// Backend operation a tool maps to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendOp {
    /// Read-only search against the backend.
    Search,
    /// Side-effecting booking creation.
    Book,
    /// Read-only lookup of one existing record.
    Get,
    /// Side-effecting cancellation of one existing record.
    Cancel,
}

/// One entry in a domain tool table.
///
/// # Invariants
/// - `name` is unique within its domain table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToolSpec {
    /// Wire-visible tool name.
    pub name: &'static str,
    /// Backend operation the tool maps to.
    pub op: BackendOp,
    /// Catalog description.
    pub description: &'static str,
}

/// Flight domain tool table.
const FLIGHTS_TOOLS: &[ToolSpec] = &[
    ToolSpec {
        name: "search_flights",
        op: BackendOp::Search,
        description: "Search available flights by origin, destination, and date",
    },
    ToolSpec {
        name: "book_flight",
        op: BackendOp::Book,
        description: "Book a flight and return a booking reference",
    },
    ToolSpec {
        name: "get_booking",
        op: BackendOp::Get,
        description: "Look up an existing flight booking by reference",
    },
    ToolSpec {
        name: "cancel_booking",
        op: BackendOp::Cancel,
        description: "Cancel an existing flight booking by reference",
    },
    ToolSpec {
        name: "list_airports",
        op: BackendOp::Search,
        description: "List airports served by this backend",
    },
];

/// Lodging domain tool table.
const LODGING_TOOLS: &[ToolSpec] = &[
    ToolSpec {
        name: "search_hotels",
        op: BackendOp::Search,
        description: "Search available hotels by city and dates",
    },
    ToolSpec {
        name: "book_hotel",
        op: BackendOp::Book,
        description: "Book a hotel stay and return a reservation reference",
    },
    ToolSpec {
        name: "get_reservation",
        op: BackendOp::Get,
        description: "Look up an existing hotel reservation by reference",
    },
    ToolSpec {
        name: "cancel_reservation",
        op: BackendOp::Cancel,
        description: "Cancel an existing hotel reservation by reference",
    },
    ToolSpec {
        name: "list_cities",
        op: BackendOp::Search,
        description: "List cities served by this backend",
    },
];

/// Vehicle domain tool table.
const VEHICLES_TOOLS: &[ToolSpec] = &[
    ToolSpec {
        name: "search_vehicles",
        op: BackendOp::Search,
        description: "Search available rental vehicles by location and dates",
    },
    ToolSpec {
        name: "book_vehicle",
        op: BackendOp::Book,
        description: "Book a rental vehicle and return a rental reference",
    },
    ToolSpec {
        name: "get_rental",
        op: BackendOp::Get,
        description: "Look up an existing vehicle rental by reference",
    },
    ToolSpec {
        name: "cancel_rental",
        op: BackendOp::Cancel,
        description: "Cancel an existing vehicle rental by reference",
    },
    ToolSpec {
        name: "list_locations",
        op: BackendOp::Search,
        description: "List rental locations served by this backend",
    },
];

/// Returns the fixed tool table for a domain.
///
/// The general domain has no tools; orchestrator-level handling answers it.
#[must_use]
pub const fn catalog(domain: Domain) -> &'static [ToolSpec] {
    match domain {
        Domain::Flights => FLIGHTS_TOOLS,
        Domain::Lodging => LODGING_TOOLS,
        Domain::Vehicles => VEHICLES_TOOLS,
        Domain::None => &[],
    }
}

/// Finds a tool entry by name within a domain table.
#[must_use]
pub fn find_tool(domain: Domain, name: &str) -> Option<&'static ToolSpec> {
    catalog(domain).iter().find(|spec| spec.name == name)
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests;
