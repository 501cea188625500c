// crates/waypoint-enforce/src/audit/tests.rs
// ============================================================================
// Module: Audit Sink Tests
// Description: Unit tests for recording and JSON-line sinks.
// Purpose: Verify record retention and serialization shape.
// ============================================================================

//! Unit tests for audit sinks.

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "Test-only assertions and helpers are permitted."
)]

use waypoint_core::AuditRecord;
use waypoint_core::EnforcementOutcome;
use waypoint_core::Identity;
use waypoint_core::Timestamp;

use super::AuditSink;
use super::JsonLineSink;
use super::NullSink;
use super::RecordingSink;

fn sample_record(outcome: EnforcementOutcome) -> AuditRecord {
    AuditRecord {
        at: Timestamp::from_unix_millis(7),
        caller: Identity::from("hotel-agent"),
        target: Identity::from("hotel-gateway"),
        path: "/rpc".to_string(),
        outcome,
        reason: "edge_permitted".to_string(),
    }
}

#[test]
fn recording_sink_retains_records_in_order() {
    let sink = RecordingSink::new();
    assert!(sink.is_empty());
    sink.record(&sample_record(EnforcementOutcome::Allow));
    sink.record(&sample_record(EnforcementOutcome::Deny));
    let records = sink.records();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].outcome, EnforcementOutcome::Allow);
    assert_eq!(records[1].outcome, EnforcementOutcome::Deny);
}

#[test]
fn json_line_sink_writes_one_document_per_line() {
    let sink = JsonLineSink::new(Vec::new());
    sink.record(&sample_record(EnforcementOutcome::Allow));
    sink.record(&sample_record(EnforcementOutcome::Unavailable));
    let buffer = sink.writer.into_inner().expect("writer");
    let text = String::from_utf8(buffer).expect("utf-8 output");
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 2);
    for line in lines {
        let value: serde_json::Value = serde_json::from_str(line).expect("valid json line");
        assert_eq!(value["at"], 7, "timestamps serialize as plain millisecond numbers");
        assert_eq!(value["caller"], "hotel-agent");
        assert_eq!(value["target"], "hotel-gateway");
        assert_eq!(value["path"], "/rpc");
    }
}

#[test]
fn null_sink_discards_everything() {
    let sink = NullSink;
    sink.record(&sample_record(EnforcementOutcome::Deny));
}
