// crates/waypoint-orchestrator/src/context_store.rs
// ============================================================================
// Module: Context Store
// Description: Trip context collaborator trait plus HTTP and in-memory impls.
// Purpose: Fetch per-caller context and record trips and itinerary items.
// Dependencies: async-trait, reqwest, serde_json, thiserror, waypoint-core
// ============================================================================

//! ## Overview
//! The context store is the external record of the caller's trips. A caller
//! with no stored state gets an empty context, never an error; only
//! transport failures surface as errors, and the orchestrator degrades
//! those to an empty context as well. Itinerary writes are append-only.

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
use reqwest::StatusCode;
use thiserror::Error;
use waypoint_core::DispatchContext;
use waypoint_core::ItineraryItem;
use waypoint_core::TripSummary;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Context store failures.
///
/// # Invariants
/// - Absence of context is not an error; only transport failures are.
#[derive(Debug, Error)]
pub enum ContextStoreError {
    /// The store was unreachable or answered malformed data.
    #[error("context store unavailable: {0}")]
    Unavailable(String),
    /// The store rejected a write.
    #[error("context store rejected write: {0}")]
    Rejected(String),
}

// ============================================================================
// SECTION: Trait
// ============================================================================

/// External record of callers' trips and itineraries.
#[async_trait]
pub trait ContextStore: Send + Sync {
    /// Fetches the caller's context; absent state yields an empty context.
    ///
    /// # Errors
    ///
    /// Returns [`ContextStoreError`] on transport failure only.
    async fn get_context(&self, caller_id: &str) -> Result<DispatchContext, ContextStoreError>;

    /// Creates a trip for the caller and returns its summary.
    ///
    /// # Errors
    ///
    /// Returns [`ContextStoreError`] when the write fails.
    async fn create_trip(
        &self,
        caller_id: &str,
        destination: &str,
    ) -> Result<TripSummary, ContextStoreError>;

    /// Appends one item to a trip's itinerary.
    ///
    /// # Errors
    ///
    /// Returns [`ContextStoreError`] when the write fails.
    async fn append_itinerary_item(
        &self,
        caller_id: &str,
        trip_id: &str,
        item: ItineraryItem,
    ) -> Result<(), ContextStoreError>;
}

// ============================================================================
// SECTION: HTTP Implementation
// ============================================================================

/// HTTP client for the context collaborator service.
///
/// # Invariants
/// - Base URL is normalized without a trailing slash.
pub struct HttpContextStore {
    /// Collaborator base URL (no trailing slash).
    base_url: String,
    /// HTTP client configured with timeouts.
    client: Client,
}

impl HttpContextStore {
    /// Builds a new HTTP context store client.
    ///
    /// # Errors
    ///
    /// Returns [`ContextStoreError`] when the HTTP client cannot be built.
    pub fn new(mut base_url: String, timeout: Duration) -> Result<Self, ContextStoreError> {
        let client = Client::builder()
            .connect_timeout(timeout)
            .timeout(timeout)
            .build()
            .map_err(|err| ContextStoreError::Unavailable(err.to_string()))?;
        let trimmed_len = base_url.trim_end_matches('/').len();
        base_url.truncate(trimmed_len);
        Ok(Self {
            base_url,
            client,
        })
    }
}

#[async_trait]
impl ContextStore for HttpContextStore {
    async fn get_context(&self, caller_id: &str) -> Result<DispatchContext, ContextStoreError> {
        let url = format!("{}/context/{caller_id}", self.base_url);
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|err| ContextStoreError::Unavailable(err.to_string()))?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(DispatchContext::default());
        }
        if !response.status().is_success() {
            return Err(ContextStoreError::Unavailable(format!(
                "context fetch returned status {}",
                response.status()
            )));
        }
        response
            .json::<DispatchContext>()
            .await
            .map_err(|err| ContextStoreError::Unavailable(err.to_string()))
    }

    async fn create_trip(
        &self,
        caller_id: &str,
        destination: &str,
    ) -> Result<TripSummary, ContextStoreError> {
        let url = format!("{}/trips", self.base_url);
        let response = self
            .client
            .post(url)
            .json(&serde_json::json!({ "caller_id": caller_id, "destination": destination }))
            .send()
            .await
            .map_err(|err| ContextStoreError::Unavailable(err.to_string()))?;
        if !response.status().is_success() {
            return Err(ContextStoreError::Rejected(format!(
                "trip creation returned status {}",
                response.status()
            )));
        }
        response
            .json::<TripSummary>()
            .await
            .map_err(|err| ContextStoreError::Unavailable(err.to_string()))
    }

    async fn append_itinerary_item(
        &self,
        caller_id: &str,
        trip_id: &str,
        item: ItineraryItem,
    ) -> Result<(), ContextStoreError> {
        let url = format!("{}/context/{caller_id}/trips/{trip_id}/itinerary", self.base_url);
        let response = self
            .client
            .post(url)
            .json(&item)
            .send()
            .await
            .map_err(|err| ContextStoreError::Unavailable(err.to_string()))?;
        if response.status().is_success() {
            Ok(())
        } else {
            Err(ContextStoreError::Rejected(format!(
                "itinerary append returned status {}",
                response.status()
            )))
        }
    }
}

// ============================================================================
// SECTION: In-Memory Implementation
// ============================================================================

/// Per-caller stored state.
#[derive(Default)]
struct CallerState {
    /// Active trip, when one was created.
    active_trip: Option<TripSummary>,
    /// Appended itinerary items.
    itinerary: Vec<ItineraryItem>,
}

/// In-memory context store for tests and local demos.
///
/// # Invariants
/// - Unknown callers yield an empty context.
#[derive(Default)]
pub struct InMemoryContextStore {
    /// Stored state keyed by caller id.
    callers: Mutex<BTreeMap<String, CallerState>>,
    /// Monotonic trip id counter.
    next_trip: AtomicU64,
}

impl InMemoryContextStore {
    /// Builds an empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ContextStore for InMemoryContextStore {
    async fn get_context(&self, caller_id: &str) -> Result<DispatchContext, ContextStoreError> {
        let Ok(guard) = self.callers.lock() else {
            return Err(ContextStoreError::Unavailable("caller store poisoned".to_string()));
        };
        Ok(guard.get(caller_id).map_or_else(DispatchContext::default, |state| DispatchContext {
            active_trip: state.active_trip.clone(),
            itinerary: state.itinerary.clone(),
            ..DispatchContext::default()
        }))
    }

    async fn create_trip(
        &self,
        caller_id: &str,
        destination: &str,
    ) -> Result<TripSummary, ContextStoreError> {
        let number = self.next_trip.fetch_add(1, Ordering::Relaxed);
        let trip = TripSummary {
            trip_id: format!("trip-{number}"),
            destination: destination.to_string(),
            name: format!("Trip to {destination}"),
            status: "planning".to_string(),
        };
        let Ok(mut guard) = self.callers.lock() else {
            return Err(ContextStoreError::Unavailable("caller store poisoned".to_string()));
        };
        let state = guard.entry(caller_id.to_string()).or_default();
        state.active_trip = Some(trip.clone());
        state.itinerary.clear();
        Ok(trip)
    }

    async fn append_itinerary_item(
        &self,
        caller_id: &str,
        trip_id: &str,
        item: ItineraryItem,
    ) -> Result<(), ContextStoreError> {
        let Ok(mut guard) = self.callers.lock() else {
            return Err(ContextStoreError::Unavailable("caller store poisoned".to_string()));
        };
        let Some(state) = guard.get_mut(caller_id) else {
            return Err(ContextStoreError::Rejected(format!("unknown caller {caller_id}")));
        };
        match &state.active_trip {
            Some(trip) if trip.trip_id == trip_id => {
                state.itinerary.push(item);
                Ok(())
            }
            _ => Err(ContextStoreError::Rejected(format!("unknown trip {trip_id}"))),
        }
    }
}
