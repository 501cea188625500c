// crates/waypoint-gateway/src/tools/tests.rs
// ============================================================================
// Module: Tool Table Tests
// Description: Unit tests for the fixed per-domain tool catalogs.
// Purpose: Verify table shape, uniqueness, and lookup behavior.
// ============================================================================

//! Unit tests for the domain tool tables.

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "Test-only assertions and helpers are permitted."
)]

use std::collections::BTreeSet;

use waypoint_core::Domain;

use super::BackendOp;
use super::catalog;
use super::find_tool;

#[test]
fn each_dispatchable_domain_serves_five_tools() {
    for domain in [Domain::Flights, Domain::Lodging, Domain::Vehicles] {
        let table = catalog(domain);
        assert_eq!(table.len(), 5, "{domain:?} table size");
        let names: BTreeSet<&str> = table.iter().map(|spec| spec.name).collect();
        assert_eq!(names.len(), 5, "{domain:?} names must be unique");
    }
}

#[test]
fn the_general_domain_has_no_tools() {
    assert!(catalog(Domain::None).is_empty());
}

#[test]
fn lookup_maps_names_to_backend_operations() {
    let spec = find_tool(Domain::Flights, "book_flight").expect("book_flight exists");
    assert_eq!(spec.op, BackendOp::Book);
    let spec = find_tool(Domain::Lodging, "cancel_reservation").expect("cancel exists");
    assert_eq!(spec.op, BackendOp::Cancel);
    let spec = find_tool(Domain::Vehicles, "list_locations").expect("list exists");
    assert_eq!(spec.op, BackendOp::Search);
    assert!(find_tool(Domain::Flights, "book_hotel").is_none());
}
