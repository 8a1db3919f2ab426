//! FluxClient trait for mocking
//!
//! This trait abstracts the Kubernetes access needed to supervise a Flux
//! reconciliation. The concrete `FluxClient` implements it against a live
//! cluster; tests use `MockFluxClient`.

use crate::error::FluxClientError;
use crate::models::{EventRecord, ResourceCoordinates};

/// Operations the reconcile monitor consumes from the control-plane API.
///
/// Implementations are stateless from the caller's point of view and are
/// shared between the event loop and the readiness wait.
/// All async methods must be `Send` to work with Tokio's work-stealing runtime.
#[async_trait::async_trait]
pub trait FluxClientTrait: Send + Sync {
    /// Lists up to `limit` events whose involved object is `namespace/name`.
    ///
    /// Ordering is whatever the backend delivers; callers treat the last
    /// element as the most recent.
    async fn list_recent_events(
        &self,
        namespace: &str,
        name: &str,
        limit: u32,
    ) -> Result<Vec<EventRecord>, FluxClientError>;

    /// Fetches a namespaced custom resource and returns its document
    /// (everything except `metadata`, so `status` sits at the top level).
    ///
    /// The document may legitimately lack `status` or `status.conditions`.
    async fn get_resource_status(
        &self,
        coordinates: &ResourceCoordinates,
        namespace: &str,
        name: &str,
    ) -> Result<serde_json::Value, FluxClientError>;
}
