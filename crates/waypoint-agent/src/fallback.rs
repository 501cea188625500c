// crates/waypoint-agent/src/fallback.rs
// ============================================================================
// Module: Fallback Classifier
// Description: Free-text answer seam for unmatched messages.
// Purpose: Let a deployment plug in a conversational fallback safely.
// Dependencies: none
// ============================================================================

//! ## Overview
//! When no dispatch rule matches, a configured fallback classifier may
//! produce a free-text answer. The seam is deliberately narrow: the
//! classifier receives text and returns text. It has no access to the
//! gateway client, so no classifier implementation can cause a tool
//! invocation.

// ============================================================================
// SECTION: Trait
// ============================================================================

/// Produces a free-text answer for an unmatched message.
pub trait FallbackClassifier: Send + Sync {
    /// Returns an answer for the message, or `None` to decline.
    fn answer(&self, message: &str) -> Option<String>;
}

/// Fallback returning one fixed reply for every message.
///
/// # Invariants
/// - Declines nothing; every message receives the configured reply.
pub struct StaticFallback {
    /// Reply returned for every message.
    reply: String,
}

impl StaticFallback {
    /// Builds a fallback with a fixed reply.
    #[must_use]
    pub fn new(reply: impl Into<String>) -> Self {
        Self {
            reply: reply.into(),
        }
    }
}

impl FallbackClassifier for StaticFallback {
    fn answer(&self, _message: &str) -> Option<String> {
        Some(self.reply.clone())
    }
}
