// crates/waypoint-core/tests/proptest_decide.rs
// ============================================================================
// Module: Decision Engine Property-Based Tests
// Description: Property tests for decision purity and default deny.
// Purpose: Detect panics and invariant violations across wide input ranges.
// ============================================================================

//! Property-based tests for the policy decision engine.

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "Test-only assertions and helpers are permitted."
)]

use std::collections::BTreeMap;
use std::collections::BTreeSet;

use proptest::prelude::*;
use waypoint_core::AuthorizationRequest;
use waypoint_core::DISCOVERY_PATHS;
use waypoint_core::DecisionReason;
use waypoint_core::Identity;
use waypoint_core::PolicyRegistry;
use waypoint_core::RegistryEntry;
use waypoint_core::Role;

/// Strategy producing small registries over a bounded identity alphabet.
fn registry_strategy() -> impl Strategy<Value = PolicyRegistry> {
    prop::collection::btree_map(
        "[a-z]{1,8}",
        prop::collection::btree_set("[a-z]{1,8}", 0 .. 4),
        0 .. 6,
    )
    .prop_map(|raw| {
        let mut entries = BTreeMap::new();
        for (identity, targets) in raw {
            entries.insert(
                Identity::from(identity.as_str()),
                RegistryEntry {
                    role: Role::Worker,
                    allowed_targets: targets.into_iter().map(Identity::from).collect::<BTreeSet<_>>(),
                },
            );
        }
        PolicyRegistry::new(entries)
    })
}

proptest! {
    #[test]
    fn decide_is_a_pure_function(
        registry in registry_strategy(),
        caller in "[a-z]{1,8}",
        target in "[a-z]{1,8}",
        path in "/[a-z]{0,12}",
    ) {
        let request = AuthorizationRequest {
            caller: Identity::from(caller.as_str()),
            target: Identity::from(target.as_str()),
            path,
        };
        let first = registry.decide(&request);
        let second = registry.decide(&request);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn unregistered_callers_never_pass_off_discovery(
        registry in registry_strategy(),
        caller in "[A-Z]{1,8}",
        target in "[a-z]{1,8}",
        path in "/[a-z]{1,12}",
    ) {
        // Uppercase callers can never collide with the lowercase registry
        // alphabet, so they are always unregistered.
        prop_assume!(!DISCOVERY_PATHS.contains(&path.as_str()));
        let decision = registry.decide(&AuthorizationRequest {
            caller: Identity::from(caller.as_str()),
            target: Identity::from(target.as_str()),
            path,
        });
        prop_assert!(!decision.allow);
        prop_assert_eq!(decision.reason, DecisionReason::UnknownCaller);
    }

    #[test]
    fn allow_implies_registered_edge_or_discovery(
        registry in registry_strategy(),
        caller in "[a-z]{1,8}",
        target in "[a-z]{1,8}",
        path in "/[a-z]{0,12}",
    ) {
        let request = AuthorizationRequest {
            caller: Identity::from(caller.as_str()),
            target: Identity::from(target.as_str()),
            path: path.clone(),
        };
        let decision = registry.decide(&request);
        if decision.allow && !DISCOVERY_PATHS.contains(&path.as_str()) {
            let entry = registry.entry(&request.caller);
            prop_assert!(entry.is_some());
            prop_assert!(
                entry.is_some_and(|entry| entry.allowed_targets.contains(&request.target))
            );
        }
    }
}
