// crates/waypoint-gateway/src/backend.rs
// ============================================================================
// Module: Domain Backends
// Description: Backend collaborator trait plus HTTP and in-memory impls.
// Purpose: Execute tool operations against the domain record of truth.
// Dependencies: async-trait, reqwest, serde_json, thiserror, waypoint-core
// ============================================================================

//! ## Overview
//! A [`Backend`] is the record of truth for one travel domain. The HTTP
//! implementation posts operations to an external service; the in-memory
//! implementation is a deterministic stand-in used by tests and local
//! demos. Backends are never retried and side effects are not
//! deduplicated; a caller that resubmits a booking gets a second booking.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::sync::Mutex;
use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use serde_json::json;
use thiserror::Error;
use waypoint_core::Domain;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Backend operation failures.
///
/// # Invariants
/// - `Rejected` is a business-level refusal; `Unavailable` is transport.
#[derive(Debug, Error)]
pub enum BackendError {
    /// Backend refused the operation with a business-level message.
    #[error("backend rejected operation: {0}")]
    Rejected(String),
    /// Backend was unreachable or answered malformed data.
    #[error("backend unavailable: {0}")]
    Unavailable(String),
}

// ============================================================================
// SECTION: Trait
// ============================================================================

/// Record-of-truth collaborator for one travel domain.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Runs a read-only search.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError`] when the backend refuses or is unreachable.
    async fn search(&self, arguments: &Value) -> Result<Value, BackendError>;

    /// Creates a booking and returns its confirmation payload.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError`] when the backend refuses or is unreachable.
    async fn book(&self, arguments: &Value) -> Result<Value, BackendError>;

    /// Looks up one existing record.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError`] when the backend refuses or is unreachable.
    async fn get(&self, arguments: &Value) -> Result<Value, BackendError>;

    /// Cancels one existing record.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError`] when the backend refuses or is unreachable.
    async fn cancel(&self, arguments: &Value) -> Result<Value, BackendError>;
}

// ============================================================================
// SECTION: HTTP Implementation
// ============================================================================

/// HTTP backend client posting operations to an external service.
///
/// # Invariants
/// - Base URL is normalized without a trailing slash.
pub struct HttpBackend {
    /// Backend base URL (no trailing slash).
    base_url: String,
    /// HTTP client configured with timeouts.
    client: Client,
}

impl HttpBackend {
    /// Builds a new HTTP backend client.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError`] when the HTTP client cannot be built.
    pub fn new(mut base_url: String, timeout: Duration) -> Result<Self, BackendError> {
        let client = Client::builder()
            .connect_timeout(timeout)
            .timeout(timeout)
            .build()
            .map_err(|err| BackendError::Unavailable(err.to_string()))?;
        let trimmed_len = base_url.trim_end_matches('/').len();
        base_url.truncate(trimmed_len);
        Ok(Self {
            base_url,
            client,
        })
    }

    /// Posts one operation and normalizes the response.
    async fn post_op(&self, op: &str, arguments: &Value) -> Result<Value, BackendError> {
        let url = format!("{}/{op}", self.base_url);
        let response = self
            .client
            .post(url)
            .json(arguments)
            .send()
            .await
            .map_err(|err| BackendError::Unavailable(err.to_string()))?;
        let status = response.status();
        let body: Value = response
            .json()
            .await
            .map_err(|err| BackendError::Unavailable(err.to_string()))?;
        if status.is_success() {
            return Ok(body);
        }
        let message = body
            .get("error")
            .and_then(Value::as_str)
            .unwrap_or("backend rejected the operation")
            .to_string();
        Err(BackendError::Rejected(message))
    }
}

#[async_trait]
impl Backend for HttpBackend {
    async fn search(&self, arguments: &Value) -> Result<Value, BackendError> {
        self.post_op("search", arguments).await
    }

    async fn book(&self, arguments: &Value) -> Result<Value, BackendError> {
        self.post_op("book", arguments).await
    }

    async fn get(&self, arguments: &Value) -> Result<Value, BackendError> {
        self.post_op("get", arguments).await
    }

    async fn cancel(&self, arguments: &Value) -> Result<Value, BackendError> {
        self.post_op("cancel", arguments).await
    }
}

// ============================================================================
// SECTION: In-Memory Implementation
// ============================================================================

/// Deterministic in-memory backend for tests and local demos.
///
/// # Invariants
/// - Searches are pure functions of their arguments.
/// - Bookings are keyed by a monotonically assigned reference.
pub struct InMemoryBackend {
    /// Domain this backend simulates.
    domain: Domain,
    /// Monotonic booking reference counter.
    next_reference: AtomicU64,
    /// Stored bookings keyed by reference.
    bookings: Mutex<BTreeMap<String, Value>>,
}

impl InMemoryBackend {
    /// Builds an empty in-memory backend for a domain.
    #[must_use]
    pub const fn new(domain: Domain) -> Self {
        Self {
            domain,
            next_reference: AtomicU64::new(1),
            bookings: Mutex::new(BTreeMap::new()),
        }
    }

    /// Extracts the booking reference argument.
    fn reference_arg(arguments: &Value) -> Result<String, BackendError> {
        arguments
            .get("reference")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| BackendError::Rejected("missing booking reference".to_string()))
    }
}

#[async_trait]
impl Backend for InMemoryBackend {
    async fn search(&self, arguments: &Value) -> Result<Value, BackendError> {
        let city = arguments.get("city").and_then(Value::as_str).unwrap_or("anywhere");
        Ok(json!({
            "domain": self.domain.as_str(),
            "query": { "city": city },
            "results": [
                { "option": 1, "city": city, "price": 120 },
                { "option": 2, "city": city, "price": 210 },
            ],
        }))
    }

    async fn book(&self, arguments: &Value) -> Result<Value, BackendError> {
        let number = self.next_reference.fetch_add(1, Ordering::Relaxed);
        let reference = format!("BK-{number:06}");
        let record = json!({
            "reference": reference,
            "domain": self.domain.as_str(),
            "status": "confirmed",
            "details": arguments,
        });
        let Ok(mut guard) = self.bookings.lock() else {
            return Err(BackendError::Unavailable("booking store poisoned".to_string()));
        };
        guard.insert(reference.clone(), record.clone());
        Ok(record)
    }

    async fn get(&self, arguments: &Value) -> Result<Value, BackendError> {
        let reference = Self::reference_arg(arguments)?;
        let Ok(guard) = self.bookings.lock() else {
            return Err(BackendError::Unavailable("booking store poisoned".to_string()));
        };
        guard
            .get(&reference)
            .cloned()
            .ok_or_else(|| BackendError::Rejected(format!("no booking with reference {reference}")))
    }

    async fn cancel(&self, arguments: &Value) -> Result<Value, BackendError> {
        let reference = Self::reference_arg(arguments)?;
        let Ok(mut guard) = self.bookings.lock() else {
            return Err(BackendError::Unavailable("booking store poisoned".to_string()));
        };
        match guard.remove(&reference) {
            Some(_) => Ok(json!({ "reference": reference, "status": "cancelled" })),
            None => Err(BackendError::Rejected(format!("no booking with reference {reference}"))),
        }
    }
}
