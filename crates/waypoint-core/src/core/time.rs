// crates/waypoint-core/src/core/time.rs
// ============================================================================
// Module: Waypoint Time Model
// Description: Unix-millisecond timestamps recorded on audit entries.
// Purpose: Provide deterministic time values without reading the wall clock.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Audit records carry explicit time values supplied at the enforcement
//! edge so that the core stays deterministic and replayable. The core
//! engine never reads wall-clock time directly.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Time Values
// ============================================================================

/// Unix-epoch-millisecond timestamp carried on Waypoint audit records.
///
/// # Invariants
/// - Values are explicitly provided by hosts; the core never reads wall-clock time.
/// - No validation is performed; monotonicity is a host responsibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(i64);

impl Timestamp {
    /// Creates a timestamp from unix epoch milliseconds.
    #[must_use]
    pub const fn from_unix_millis(millis: i64) -> Self {
        Self(millis)
    }

    /// Returns the timestamp as unix epoch milliseconds.
    #[must_use]
    pub const fn unix_millis(self) -> i64 {
        self.0
    }
}
