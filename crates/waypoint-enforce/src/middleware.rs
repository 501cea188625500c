// crates/waypoint-enforce/src/middleware.rs
// ============================================================================
// Module: Enforcement Middleware
// Description: axum layer gating inbound calls on policy decisions.
// Purpose: Enforce allow/deny/unavailable with one audit record per call.
// Dependencies: axum, waypoint-core
// ============================================================================

//! ## Overview
//! The middleware runs before every protected handler. It reads the
//! asserted caller identity from `x-caller-id`, asks the decision point
//! about the (caller, target, path) edge, and either forwards the request,
//! rejects with 403 `forbidden`, or rejects with 503
//! `decision_unavailable` when no decision could be obtained. Discovery
//! paths are forwarded without requiring a caller header. Every evaluated
//! call emits exactly one audit record.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use axum::Json;
use axum::Router;
use axum::extract::Request;
use axum::extract::State;
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::middleware::from_fn_with_state;
use axum::response::IntoResponse;
use axum::response::Response;
use waypoint_core::AuditRecord;
use waypoint_core::AuthorizationRequest;
use waypoint_core::DISCOVERY_PATHS;
use waypoint_core::EnforcementOutcome;
use waypoint_core::ErrorBody;
use waypoint_core::ErrorKind;
use waypoint_core::Identity;
use waypoint_core::Timestamp;

use crate::audit::AuditSink;
use crate::decision::DecisionPoint;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Header carrying the asserted caller identity.
pub const CALLER_HEADER: &str = waypoint_core::HEADER_CALLER;

/// Audit reason recorded when the caller header is absent.
const REASON_MISSING_CALLER: &str = "missing_caller_header";

/// Audit reason recorded when no decision could be obtained.
const REASON_UNAVAILABLE: &str = "decision_unavailable";

// ============================================================================
// SECTION: Enforcer State
// ============================================================================

/// Shared enforcement state for one protected service.
///
/// # Invariants
/// - `target` is this service's own registered identity.
pub struct Enforcer {
    /// Identity of the service this enforcer protects.
    target: Identity,
    /// Decision source consulted for every call.
    decision_point: Arc<dyn DecisionPoint>,
    /// Audit destination; exactly one record per evaluated call.
    audit: Arc<dyn AuditSink>,
}

impl Enforcer {
    /// Builds an enforcer for the given target service.
    #[must_use]
    pub fn new(
        target: Identity,
        decision_point: Arc<dyn DecisionPoint>,
        audit: Arc<dyn AuditSink>,
    ) -> Self {
        Self {
            target,
            decision_point,
            audit,
        }
    }

    /// Records one audit entry for an evaluated call.
    fn audit(&self, caller: &Identity, path: &str, outcome: EnforcementOutcome, reason: &str) {
        self.audit.record(&AuditRecord {
            at: wall_clock_now(),
            caller: caller.clone(),
            target: self.target.clone(),
            path: path.to_string(),
            outcome,
            reason: reason.to_string(),
        });
    }
}

// ============================================================================
// SECTION: Layer
// ============================================================================

/// Installs enforcement in front of every route in the router.
#[must_use]
pub fn protect(router: Router, enforcer: Arc<Enforcer>) -> Router {
    router.layer(from_fn_with_state(enforcer, enforce))
}

/// Middleware entry point evaluating one inbound call.
async fn enforce(
    State(enforcer): State<Arc<Enforcer>>,
    request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path().to_string();
    let caller = request
        .headers()
        .get(CALLER_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(Identity::from);

    let Some(caller) = caller else {
        if DISCOVERY_PATHS.contains(&path.as_str()) {
            let anonymous = Identity::from("");
            enforcer.audit(&anonymous, &path, EnforcementOutcome::Allow, "discovery_path");
            return next.run(request).await;
        }
        let anonymous = Identity::from("");
        enforcer.audit(&anonymous, &path, EnforcementOutcome::Deny, REASON_MISSING_CALLER);
        return reject(
            StatusCode::UNAUTHORIZED,
            ErrorKind::Validation,
            "caller identity header required",
        );
    };

    let authz = AuthorizationRequest {
        caller: caller.clone(),
        target: enforcer.target.clone(),
        path: path.clone(),
    };
    match enforcer.decision_point.decide(&authz).await {
        Ok(decision) if decision.allow => {
            enforcer.audit(&caller, &path, EnforcementOutcome::Allow, decision.reason.as_str());
            next.run(request).await
        }
        Ok(decision) => {
            enforcer.audit(&caller, &path, EnforcementOutcome::Deny, decision.reason.as_str());
            reject(StatusCode::FORBIDDEN, ErrorKind::Forbidden, "call not permitted by policy")
        }
        Err(_) => {
            enforcer.audit(&caller, &path, EnforcementOutcome::Unavailable, REASON_UNAVAILABLE);
            reject(
                StatusCode::SERVICE_UNAVAILABLE,
                ErrorKind::DecisionUnavailable,
                "authorization decision unavailable",
            )
        }
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Builds a rejection response with a stable error body.
fn reject(status: StatusCode, kind: ErrorKind, message: &str) -> Response {
    (status, Json(ErrorBody::new(kind, message))).into_response()
}

/// Reads the wall clock as an audit timestamp.
fn wall_clock_now() -> Timestamp {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX));
    Timestamp::from_unix_millis(millis)
}
