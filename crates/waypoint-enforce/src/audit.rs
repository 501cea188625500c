// crates/waypoint-enforce/src/audit.rs
// ============================================================================
// Module: Audit Sinks
// Description: AuditSink trait and reference implementations.
// Purpose: Record one audit entry per enforced call.
// Dependencies: serde_json, waypoint-core
// ============================================================================

//! ## Overview
//! Enforcement emits one [`AuditRecord`] per evaluated call through an
//! [`AuditSink`]. The JSON-line sink serializes records to any writer (the
//! CLI hands it stderr at the process edge); the recording sink keeps
//! records in memory for assertions; the null sink discards them. Sink
//! failures are swallowed by the sinks themselves so auditing can never
//! change an enforcement outcome.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Write;
use std::sync::Mutex;

use waypoint_core::AuditRecord;

// ============================================================================
// SECTION: Trait
// ============================================================================

/// Receives audit records from enforcement.
pub trait AuditSink: Send + Sync {
    /// Records one enforcement outcome.
    fn record(&self, record: &AuditRecord);
}

// ============================================================================
// SECTION: Implementations
// ============================================================================

/// Sink that discards every record.
pub struct NullSink;

impl AuditSink for NullSink {
    fn record(&self, _record: &AuditRecord) {}
}

/// Sink that retains records in memory.
///
/// # Invariants
/// - Records are retained in arrival order.
#[derive(Default)]
pub struct RecordingSink {
    /// Retained records.
    records: Mutex<Vec<AuditRecord>>,
}

impl RecordingSink {
    /// Builds an empty recording sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of all retained records.
    #[must_use]
    pub fn records(&self) -> Vec<AuditRecord> {
        self.records.lock().map_or_else(|_| Vec::new(), |guard| guard.clone())
    }

    /// Returns the number of retained records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.lock().map_or(0, |guard| guard.len())
    }

    /// Returns whether no records were retained.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl AuditSink for RecordingSink {
    fn record(&self, record: &AuditRecord) {
        if let Ok(mut guard) = self.records.lock() {
            guard.push(record.clone());
        }
    }
}

/// Sink that writes one JSON document per line.
///
/// # Invariants
/// - Write failures are dropped; auditing never affects enforcement.
pub struct JsonLineSink<W: Write + Send> {
    /// Destination writer.
    writer: Mutex<W>,
}

impl<W: Write + Send> JsonLineSink<W> {
    /// Builds a sink over the given writer.
    #[must_use]
    pub const fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }
}

impl<W: Write + Send> AuditSink for JsonLineSink<W> {
    fn record(&self, record: &AuditRecord) {
        let Ok(line) = serde_json::to_string(record) else {
            return;
        };
        if let Ok(mut guard) = self.writer.lock() {
            let _ = writeln!(guard, "{line}");
        }
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests;
