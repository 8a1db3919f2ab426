//! Mock FluxClient for unit testing
//!
//! Stores events and resource documents in memory and can be told to fail
//! or stall, so callers can be tested without a cluster.

use crate::error::FluxClientError;
use crate::models::{EventRecord, ResourceCoordinates};
use crate::flux_trait::FluxClientTrait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

type ResourceKey = (String, String, String);

/// Mock FluxClient for testing
///
/// Clones share state, so a test can keep one handle for scripting while the
/// code under test owns another.
#[derive(Debug, Clone, Default)]
pub struct MockFluxClient {
    events: Arc<Mutex<Vec<EventRecord>>>,
    documents: Arc<Mutex<HashMap<ResourceKey, serde_json::Value>>>,
    event_failures: Arc<Mutex<u32>>,
    status_failures: Arc<Mutex<u32>>,
    latency: Arc<Mutex<Option<Duration>>>,
    last_event_query: Arc<Mutex<Option<(String, String, u32)>>>,
    event_calls: Arc<AtomicUsize>,
    status_calls: Arc<AtomicUsize>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

fn key(coordinates: &ResourceCoordinates, namespace: &str, name: &str) -> ResourceKey {
    (coordinates.plural.to_string(), namespace.to_string(), name.to_string())
}

impl MockFluxClient {
    /// Create a new mock client with no events and no resources
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the events returned by `list_recent_events` (oldest first)
    pub fn set_events(&self, events: Vec<EventRecord>) {
        *lock(&self.events) = events;
    }

    /// Store the document returned for a resource
    pub fn set_document(
        &self,
        coordinates: &ResourceCoordinates,
        namespace: &str,
        name: &str,
        document: serde_json::Value,
    ) {
        lock(&self.documents).insert(key(coordinates, namespace, name), document);
    }

    /// Make the next `count` event listings fail
    pub fn fail_next_event_calls(&self, count: u32) {
        *lock(&self.event_failures) = count;
    }

    /// Make the next `count` status fetches fail
    pub fn fail_next_status_calls(&self, count: u32) {
        *lock(&self.status_failures) = count;
    }

    /// Delay every call by `latency` before answering
    pub fn set_latency(&self, latency: Duration) {
        *lock(&self.latency) = Some(latency);
    }

    /// Number of `list_recent_events` calls so far
    #[must_use]
    pub fn event_calls(&self) -> usize {
        self.event_calls.load(Ordering::SeqCst)
    }

    /// Number of `get_resource_status` calls so far
    #[must_use]
    pub fn status_calls(&self) -> usize {
        self.status_calls.load(Ordering::SeqCst)
    }

    /// Arguments of the most recent event listing as (namespace, name, limit)
    #[must_use]
    pub fn last_event_query(&self) -> Option<(String, String, u32)> {
        lock(&self.last_event_query).clone()
    }

    async fn simulate_latency(&self) {
        let latency = *lock(&self.latency);
        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }
    }

    fn take_failure(counter: &Mutex<u32>) -> bool {
        let mut remaining = lock(counter);
        if *remaining > 0 {
            *remaining -= 1;
            true
        } else {
            false
        }
    }
}

#[async_trait::async_trait]
impl FluxClientTrait for MockFluxClient {
    async fn list_recent_events(
        &self,
        namespace: &str,
        name: &str,
        limit: u32,
    ) -> Result<Vec<EventRecord>, FluxClientError> {
        self.event_calls.fetch_add(1, Ordering::SeqCst);
        *lock(&self.last_event_query) = Some((namespace.to_string(), name.to_string(), limit));
        self.simulate_latency().await;

        if Self::take_failure(&self.event_failures) {
            return Err(FluxClientError::Api("injected event listing failure".to_string()));
        }

        let events = lock(&self.events);
        let limit = usize::try_from(limit).unwrap_or(usize::MAX);
        Ok(events.iter().take(limit).cloned().collect())
    }

    async fn get_resource_status(
        &self,
        coordinates: &ResourceCoordinates,
        namespace: &str,
        name: &str,
    ) -> Result<serde_json::Value, FluxClientError> {
        self.status_calls.fetch_add(1, Ordering::SeqCst);
        self.simulate_latency().await;

        if Self::take_failure(&self.status_failures) {
            return Err(FluxClientError::Api("injected status failure".to_string()));
        }

        lock(&self.documents)
            .get(&key(coordinates, namespace, name))
            .cloned()
            .ok_or_else(|| FluxClientError::NotFound(format!("{coordinates} {namespace}/{name}")))
    }
}
