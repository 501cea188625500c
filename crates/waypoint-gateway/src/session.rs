// crates/waypoint-gateway/src/session.rs
// ============================================================================
// Module: Session Table
// Description: TTL-bounded session tracking for gateway callers.
// Purpose: Establish, validate, and expire invocation sessions.
// Dependencies: rand, std
// ============================================================================

//! ## Overview
//! Sessions are opaque random identifiers with a sliding TTL. The table is
//! the only mutable shared state in the gateway; its mutex guards map
//! operations only. Expired entries are reaped lazily on access, so an
//! idle gateway holds stale entries but never honors them.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::sync::Mutex;
use std::time::Duration;
use std::time::Instant;

use rand::Rng;
use rand::distributions::Alphanumeric;
use waypoint_core::SessionId;

// ============================================================================
// SECTION: Session Table
// ============================================================================

/// Length of the random portion of a session id.
const SESSION_ID_LEN: usize = 24;

/// TTL-bounded session table.
///
/// # Invariants
/// - A session id validates only while its sliding TTL window is open.
/// - The mutex is held only across map operations, never across I/O.
pub struct SessionTable {
    /// Sliding time-to-live for each session.
    ttl: Duration,
    /// Active sessions and their last-seen instants.
    sessions: Mutex<BTreeMap<SessionId, Instant>>,
}

impl SessionTable {
    /// Builds an empty table with the given sliding TTL.
    #[must_use]
    pub const fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            sessions: Mutex::new(BTreeMap::new()),
        }
    }

    /// Establishes a new session and returns its id.
    #[must_use]
    pub fn create(&self) -> SessionId {
        let random: String =
            rand::thread_rng().sample_iter(&Alphanumeric).take(SESSION_ID_LEN).map(char::from).collect();
        let id = SessionId::from(format!("sess-{random}"));
        if let Ok(mut guard) = self.sessions.lock() {
            guard.insert(id.clone(), Instant::now());
        }
        id
    }

    /// Validates a presented session id, refreshing its TTL window.
    ///
    /// Returns `false` for unknown or expired sessions; an expired entry is
    /// removed on the way out.
    #[must_use]
    pub fn validate(&self, id: &SessionId) -> bool {
        let Ok(mut guard) = self.sessions.lock() else {
            return false;
        };
        let now = Instant::now();
        match guard.get_mut(id) {
            Some(last_seen) if now.duration_since(*last_seen) <= self.ttl => {
                *last_seen = now;
                true
            }
            Some(_) => {
                guard.remove(id);
                false
            }
            None => false,
        }
    }

    /// Returns the number of tracked sessions, including not-yet-reaped ones.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sessions.lock().map_or(0, |guard| guard.len())
    }

    /// Returns whether the table tracks no sessions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
